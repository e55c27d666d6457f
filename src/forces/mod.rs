//! Composable force models for orbit propagation.
//!
//! Every model implements [`ForceModel`]; a [`ForceSet`] sums the enabled
//! contributions. Gravity models are split so that [`J2Gravity`] carries the
//! oblateness term only and composes with [`TwoBodyGravity`].

mod drag;
mod gravity;
mod relativity;

pub use drag::AtmosphericDrag;
pub use gravity::{J2Gravity, TwoBodyGravity};
pub use relativity::{sun_position_approx, DeSitter, LenseThirring, Schwarzschild};

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::Serialize;

use crate::error::Result;
use crate::physics::drag::DragConfig;

/// Relative tolerance between forward and reverse summation.
const ORDER_TOLERANCE: f64 = 1e-12;

/// One additive acceleration contribution.
pub trait ForceModel: Send + Sync {
    /// Acceleration (m/s^2, ECI) at the given ECI position and velocity.
    fn acceleration(
        &self,
        epoch: DateTime<Utc>,
        pos: &Vector3<f64>,
        vel: &Vector3<f64>,
    ) -> Result<Vector3<f64>>;

    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// ForceSet
// ---------------------------------------------------------------------------

/// Ordered collection of force models whose accelerations are summed.
#[derive(Default)]
pub struct ForceSet {
    models: Vec<Box<dyn ForceModel>>,
}

impl ForceSet {
    pub fn new() -> Self {
        Self { models: Vec::new() }
    }

    pub fn add(&mut self, model: Box<dyn ForceModel>) {
        log::debug!("Adding force model: {}", model.name());
        self.models.push(model);
    }

    pub fn builder() -> ForceSetBuilder {
        ForceSetBuilder { models: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> &[Box<dyn ForceModel>] {
        &self.models
    }

    pub fn model_names(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    /// Sum of all contributions; an empty set yields zero.
    pub fn total_acceleration(
        &self,
        epoch: DateTime<Utc>,
        pos: &Vector3<f64>,
        vel: &Vector3<f64>,
    ) -> Result<Vector3<f64>> {
        self.models
            .iter()
            .try_fold(Vector3::zeros(), |acc, m| m.acceleration(epoch, pos, vel).map(|a| acc + a))
    }

    /// Per-model contributions in insertion order.
    pub fn acceleration_breakdown(
        &self,
        epoch: DateTime<Utc>,
        pos: &Vector3<f64>,
        vel: &Vector3<f64>,
    ) -> Result<Vec<(&'static str, Vector3<f64>)>> {
        self.models
            .iter()
            .map(|m| m.acceleration(epoch, pos, vel).map(|a| (m.name(), a)))
            .collect()
    }

    /// Point-mass gravity only.
    pub fn two_body() -> Self {
        Self::builder().with(TwoBodyGravity).build()
    }

    /// Point mass plus J2 oblateness.
    pub fn j2() -> Self {
        Self::builder().with(TwoBodyGravity).with(J2Gravity).build()
    }

    /// Point mass, J2 and drag in a co-rotating atmosphere.
    pub fn leo(drag: DragConfig) -> Self {
        Self::builder()
            .with(TwoBodyGravity)
            .with(J2Gravity)
            .with(AtmosphericDrag::new(drag))
            .build()
    }
}

pub struct ForceSetBuilder {
    models: Vec<Box<dyn ForceModel>>,
}

impl ForceSetBuilder {
    pub fn with<F: ForceModel + 'static>(mut self, model: F) -> Self {
        self.models.push(Box::new(model));
        self
    }

    pub fn with_boxed(mut self, model: Box<dyn ForceModel>) -> Self {
        self.models.push(model);
        self
    }

    pub fn build(self) -> ForceSet {
        let mut set = ForceSet::new();
        for m in self.models {
            set.add(m);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Composition check
// ---------------------------------------------------------------------------

/// Superposition of a list of models with an order-independence check.
#[derive(Debug, Clone, Serialize)]
pub struct Composition {
    pub total: Vector3<f64>,
    pub contributions: Vec<(&'static str, Vector3<f64>)>,
    /// |forward sum - reverse sum|, m/s^2.
    pub composition_residual: f64,
    pub is_order_independent: bool,
}

/// Evaluate every model once and compare forward and reverse summation.
pub fn compose_forces(
    models: &[Box<dyn ForceModel>],
    epoch: DateTime<Utc>,
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
) -> Result<Composition> {
    let contributions = models
        .iter()
        .map(|m| m.acceleration(epoch, pos, vel).map(|a| (m.name(), a)))
        .collect::<Result<Vec<_>>>()?;

    let forward = contributions.iter().fold(Vector3::zeros(), |acc, (_, a)| acc + a);
    let reverse = contributions.iter().rev().fold(Vector3::zeros(), |acc, (_, a)| acc + a);
    let residual = (forward - reverse).norm();
    let scale: f64 = contributions.iter().map(|(_, a)| a.norm()).sum();

    Ok(Composition {
        total: forward,
        contributions,
        composition_residual: residual,
        is_order_independent: residual <= ORDER_TOLERANCE * scale,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

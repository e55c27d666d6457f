use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use super::ForceModel;
use crate::error::Result;
use crate::physics::gravity::{gravity_pointmass_eci, j2_perturbation_eci};

/// Central-body point-mass gravity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoBodyGravity;

impl ForceModel for TwoBodyGravity {
    fn acceleration(&self, _epoch: DateTime<Utc>, pos: &Vector3<f64>, _vel: &Vector3<f64>) -> Result<Vector3<f64>> {
        Ok(gravity_pointmass_eci(pos))
    }

    fn name(&self) -> &'static str {
        "two_body"
    }
}

/// J2 oblateness perturbation; add alongside [`TwoBodyGravity`].
#[derive(Debug, Clone, Copy, Default)]
pub struct J2Gravity;

impl ForceModel for J2Gravity {
    fn acceleration(&self, _epoch: DateTime<Utc>, pos: &Vector3<f64>, _vel: &Vector3<f64>) -> Result<Vector3<f64>> {
        Ok(j2_perturbation_eci(pos))
    }

    fn name(&self) -> &'static str {
        "j2"
    }
}

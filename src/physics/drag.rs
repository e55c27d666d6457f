use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{MU_EARTH, R_EARTH_MEAN};
use crate::error::{require_positive, Error, Result};
use crate::physics::atmosphere::atmospheric_density;

/// Per-satellite drag properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    pub cd: f64,      // drag coefficient, typically 2.0-2.5
    pub area_m2: f64, // cross-sectional area, m^2
    pub mass_kg: f64, // kg
}

impl DragConfig {
    /// Validated constructor: positive area and mass, non-negative Cd.
    pub fn new(cd: f64, area_m2: f64, mass_kg: f64) -> Result<Self> {
        if !cd.is_finite() || cd < 0.0 {
            return Err(Error::InvalidParameter {
                name: "cd",
                value: cd,
                reason: "must be finite and non-negative",
            });
        }
        require_positive("area_m2", area_m2)?;
        require_positive("mass_kg", mass_kg)?;
        Ok(Self { cd, area_m2, mass_kg })
    }

    /// Re-check a config built with a struct literal or deserialized.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.cd, self.area_m2, self.mass_kg).map(|_| ())
    }

    /// Ballistic coefficient Bc = Cd * A / m (m^2/kg).
    pub fn ballistic_coefficient(&self) -> f64 {
        self.cd * self.area_m2 / self.mass_kg
    }
}

/// Drag acceleration magnitude: 0.5 * rho * v^2 * Bc.
pub fn drag_acceleration(density: f64, speed: f64, drag: &DragConfig) -> f64 {
    0.5 * density * speed * speed * drag.ballistic_coefficient()
}

/// Drag acceleration vector opposing the velocity relative to the atmosphere.
pub fn drag_acceleration_vector(density: f64, vel_rel: &Vector3<f64>, drag: &DragConfig) -> Vector3<f64> {
    let speed = vel_rel.norm();
    if speed > 1e-6 {
        -vel_rel / speed * drag_acceleration(density, speed, drag)
    } else {
        Vector3::zeros()
    }
}

/// da/dt = -rho(h) * v * Bc * a, with v = sqrt(mu/a) and h = (a - R) / 1000.
///
/// Eccentricity is accepted for signature stability; the model is circular.
pub fn semi_major_axis_decay_rate(a: f64, _e: f64, drag: &DragConfig) -> Result<f64> {
    require_positive("semi_major_axis", a)?;
    let h_km = (a - R_EARTH_MEAN) / 1000.0;
    let v = (MU_EARTH / a).sqrt();
    let rho = atmospheric_density(h_km)?;
    Ok(-rho * v * drag.ballistic_coefficient() * a)
}

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use super::ForceModel;
use crate::constants::{OMEGA_EARTH, R_EARTH_MEAN};
use crate::error::Result;
use crate::physics::atmosphere::density_or_vacuum;
use crate::physics::drag::{drag_acceleration_vector, DragConfig};

/// Drag in an atmosphere co-rotating with the Earth.
///
/// Zero above the density table; below 100 km the range error is
/// returned so that propagation stops at re-entry.
#[derive(Debug, Clone, Copy)]
pub struct AtmosphericDrag {
    pub drag: DragConfig,
}

impl AtmosphericDrag {
    pub fn new(drag: DragConfig) -> Self {
        Self { drag }
    }

    fn relative_velocity(pos: &Vector3<f64>, vel: &Vector3<f64>) -> Vector3<f64> {
        let omega = Vector3::new(0.0, 0.0, OMEGA_EARTH);
        vel - omega.cross(pos)
    }
}

impl ForceModel for AtmosphericDrag {
    fn acceleration(&self, _epoch: DateTime<Utc>, pos: &Vector3<f64>, vel: &Vector3<f64>) -> Result<Vector3<f64>> {
        let altitude_km = (pos.norm() - R_EARTH_MEAN) / 1000.0;
        let rho = density_or_vacuum(altitude_km)?;
        if rho <= 0.0 {
            return Ok(Vector3::zeros());
        }
        let v_rel = Self::relative_velocity(pos, vel);
        Ok(drag_acceleration_vector(rho, &v_rel, &self.drag))
    }

    fn name(&self) -> &'static str {
        "drag"
    }
}

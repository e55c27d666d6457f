//! Post-Newtonian corrections (IERS Conventions 2010, ch. 10, beta = gamma = 1).

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use super::ForceModel;
use crate::constants::{AU, C_LIGHT, EARTH_ANGULAR_MOMENTUM, GM_SUN, MU_EARTH};
use crate::epoch::{add_seconds, julian_date};
use crate::error::Result;

/// Finite-difference span for the Earth's heliocentric velocity, s.
const EARTH_VELOCITY_SPAN_S: f64 = 3600.0;

/// Geocentric Sun position (m, mean equator of date), Astronomical Almanac
/// low-precision formulae (~0.01 deg).
pub fn sun_position_approx(epoch: DateTime<Utc>) -> Vector3<f64> {
    let n = julian_date(epoch) - 2_451_545.0;
    let mean_lon = (280.460 + 0.985_647_4 * n).to_radians();
    let g = (357.528 + 0.985_600_3 * n).to_radians();
    let ecl_lon = mean_lon + (1.915_f64.to_radians()) * g.sin() + (0.020_f64.to_radians()) * (2.0 * g).sin();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();
    let dist = AU * (1.000_14 - 0.016_71 * g.cos() - 0.000_14 * (2.0 * g).cos());

    Vector3::new(
        dist * ecl_lon.cos(),
        dist * obliquity.cos() * ecl_lon.sin(),
        dist * obliquity.sin() * ecl_lon.sin(),
    )
}

/// Schwarzschild field of the Earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct Schwarzschild;

impl ForceModel for Schwarzschild {
    fn acceleration(&self, _epoch: DateTime<Utc>, pos: &Vector3<f64>, vel: &Vector3<f64>) -> Result<Vector3<f64>> {
        let r = pos.norm();
        if r < 1.0 {
            return Ok(Vector3::zeros());
        }
        let coeff = MU_EARTH / (C_LIGHT * C_LIGHT * r * r * r);
        let radial = 4.0 * MU_EARTH / r - vel.norm_squared();
        Ok(coeff * (radial * pos + 4.0 * pos.dot(vel) * vel))
    }

    fn name(&self) -> &'static str {
        "schwarzschild"
    }
}

/// Lense-Thirring frame dragging from the Earth's rotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenseThirring;

impl ForceModel for LenseThirring {
    fn acceleration(&self, _epoch: DateTime<Utc>, pos: &Vector3<f64>, vel: &Vector3<f64>) -> Result<Vector3<f64>> {
        let r = pos.norm();
        if r < 1.0 {
            return Ok(Vector3::zeros());
        }
        let j = Vector3::new(0.0, 0.0, EARTH_ANGULAR_MOMENTUM);
        let coeff = 2.0 * MU_EARTH / (C_LIGHT * C_LIGHT * r * r * r);
        let r_cross_v = pos.cross(vel);
        Ok(coeff * (3.0 / (r * r) * pos.dot(&j) * r_cross_v + vel.cross(&j)))
    }

    fn name(&self) -> &'static str {
        "lense_thirring"
    }
}

/// De Sitter (geodesic) precession from the Earth's heliocentric motion:
/// `a = -3 GM_sun / (2 c^2 R^3) * (R x V_E) x v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeSitter;

impl DeSitter {
    /// Heliocentric Earth velocity, one-hour forward difference of the Sun vector.
    pub fn earth_velocity(epoch: DateTime<Utc>) -> Vector3<f64> {
        let s0 = sun_position_approx(epoch);
        let s1 = sun_position_approx(add_seconds(epoch, EARTH_VELOCITY_SPAN_S));
        -(s1 - s0) / EARTH_VELOCITY_SPAN_S
    }
}

impl ForceModel for DeSitter {
    fn acceleration(&self, epoch: DateTime<Utc>, _pos: &Vector3<f64>, vel: &Vector3<f64>) -> Result<Vector3<f64>> {
        let sun = sun_position_approx(epoch);
        let r = sun.norm();
        let v_earth = Self::earth_velocity(epoch);
        let coeff = -3.0 * GM_SUN / (2.0 * C_LIGHT * C_LIGHT * r * r * r);
        Ok(coeff * sun.cross(&v_earth).cross(vel))
    }

    fn name(&self) -> &'static str {
        "de_sitter"
    }
}

use crate::constants::{MU_EARTH, R_EARTH_MEAN};
use crate::error::{require_positive, Error, Result};

/// Result of a Hohmann transfer calculation.
#[derive(Debug, Clone, Copy)]
pub struct HohmannTransfer {
    pub dv1: f64,           // m/s, first burn (raise apoapsis)
    pub dv2: f64,           // m/s, second burn (circularize)
    pub total_dv: f64,      // m/s, total delta-v
    pub transfer_time: f64, // s, half the transfer orbit period
    pub r1: f64,            // m, initial orbit radius
    pub r2: f64,            // m, final orbit radius
}

/// Hohmann transfer between two circular orbits about the Earth.
///
/// `r1` and `r2` are orbital radii (not altitudes), in meters.
pub fn hohmann(r1: f64, r2: f64) -> HohmannTransfer {
    hohmann_mu(r1, r2, MU_EARTH)
}

pub fn hohmann_mu(r1: f64, r2: f64, mu: f64) -> HohmannTransfer {
    let a_transfer = (r1 + r2) / 2.0;

    let v_circ1 = (mu / r1).sqrt();
    let v_circ2 = (mu / r2).sqrt();

    let v_transfer_1 = (mu * (2.0 / r1 - 1.0 / a_transfer)).sqrt();
    let v_transfer_2 = (mu * (2.0 / r2 - 1.0 / a_transfer)).sqrt();

    let dv1 = (v_transfer_1 - v_circ1).abs();
    let dv2 = (v_circ2 - v_transfer_2).abs();

    let transfer_time = std::f64::consts::PI * (a_transfer.powi(3) / mu).sqrt();

    HohmannTransfer {
        dv1,
        dv2,
        total_dv: dv1 + dv2,
        transfer_time,
        r1,
        r2,
    }
}

/// Circular orbit velocity at radius `r` (m).
pub fn circular_velocity(r: f64) -> f64 {
    (MU_EARTH / r).sqrt()
}

/// Single retrograde burn that lowers perigee of a circular orbit of
/// radius `a` to `perigee_alt_km` above the mean radius.
///
/// Zero when the target perigee is already at or above the orbit.
pub fn deorbit_delta_v(a: f64, perigee_alt_km: f64) -> Result<f64> {
    require_positive("a", a)?;
    if !perigee_alt_km.is_finite() || perigee_alt_km < 0.0 {
        return Err(Error::InvalidParameter {
            name: "perigee_alt_km",
            value: perigee_alt_km,
            reason: "must be finite and non-negative",
        });
    }
    let r_p = R_EARTH_MEAN + perigee_alt_km * 1000.0;
    if r_p >= a {
        return Ok(0.0);
    }
    let a_transfer = (a + r_p) / 2.0;
    let v_apo = (MU_EARTH * (2.0 / a - 1.0 / a_transfer)).sqrt();
    Ok(circular_velocity(a) - v_apo)
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::frames::{ecef_to_geodetic, eci_to_ecef, gmst_rad};
use crate::orbital::constellation::Satellite;
use crate::orbital::propagator::propagate_circular;

/// Sub-satellite point at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundTrackPoint {
    pub time: DateTime<Utc>,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_km: f64,
}

/// Ground track on the analytic circular path (no perturbations).
///
/// Suited to synthetic shells and short spans; use the numerical
/// propagator when drag or J2 matter.
pub fn compute_ground_track(
    sat: &Satellite,
    start: DateTime<Utc>,
    duration: f64,
    step: f64,
) -> Result<Vec<GroundTrackPoint>> {
    let states = propagate_circular(sat, start, duration, step)?;
    Ok(states
        .iter()
        .map(|s| {
            let (pos_ecef, _) = eci_to_ecef(&s.pos, &s.vel, gmst_rad(s.epoch));
            let (lat_deg, lon_deg, alt_m) = ecef_to_geodetic(&pos_ecef);
            GroundTrackPoint {
                time: s.epoch,
                lat_deg,
                lon_deg,
                alt_km: alt_m / 1000.0,
            }
        })
        .collect())
}

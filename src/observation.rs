use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::epoch::{add_seconds, seconds_between};
use crate::frames::{eci_to_ecef, geodetic_to_ecef, gmst_rad};
use crate::orbital::propagator::OrbitalState;

/// Ground site (geodetic, WGS84).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundStation {
    pub name: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
    pub min_elevation_deg: f64, // visibility mask
}

impl GroundStation {
    pub fn new(name: impl Into<String>, lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            name: name.into(),
            lat_deg,
            lon_deg,
            alt_m: 0.0,
            min_elevation_deg: 10.0,
        }
    }

    pub fn ecef(&self) -> Vector3<f64> {
        geodetic_to_ecef(self.lat_deg, self.lon_deg, self.alt_m)
    }
}

/// Topocentric azimuth (from north, clockwise), elevation and slant range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookAngles {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_m: f64,
}

pub fn look_angles(station: &GroundStation, sat_ecef: &Vector3<f64>) -> LookAngles {
    let rho = sat_ecef - station.ecef();
    let range_m = rho.norm();

    let (sin_lat, cos_lat) = station.lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = station.lon_deg.to_radians().sin_cos();
    let east = Vector3::new(-sin_lon, cos_lon, 0.0);
    let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

    let elevation_deg = if range_m > 0.0 {
        (up.dot(&rho) / range_m).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        90.0
    };
    let azimuth_deg = east.dot(&rho).atan2(north.dot(&rho)).to_degrees().rem_euclid(360.0);

    LookAngles { azimuth_deg, elevation_deg, range_m }
}

/// One pass above the station's elevation mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccessWindow {
    pub rise: DateTime<Utc>,
    pub set: DateTime<Utc>,
    pub max_elevation_deg: f64,
}

impl AccessWindow {
    pub fn duration_s(&self) -> f64 {
        seconds_between(self.rise, self.set)
    }
}

/// Passes of an ECI trajectory over `station`.
///
/// Rise and set are linearly interpolated between samples; a pass already
/// in progress at either end of the trajectory is clipped to it.
pub fn compute_access_windows(trajectory: &[OrbitalState], station: &GroundStation) -> Vec<AccessWindow> {
    let mask = station.min_elevation_deg;
    let elevations: Vec<f64> = trajectory
        .iter()
        .map(|s| {
            let (ecef, _) = eci_to_ecef(&s.pos, &s.vel, gmst_rad(s.epoch));
            look_angles(station, &ecef).elevation_deg
        })
        .collect();

    let crossing = |i: usize| {
        let (e0, e1) = (elevations[i - 1], elevations[i]);
        let frac = ((mask - e0) / (e1 - e0)).clamp(0.0, 1.0);
        let span = seconds_between(trajectory[i - 1].epoch, trajectory[i].epoch);
        add_seconds(trajectory[i - 1].epoch, frac * span)
    };

    let mut windows = Vec::new();
    let mut open: Option<(DateTime<Utc>, f64)> = None;

    for (i, &el) in elevations.iter().enumerate() {
        let visible = el >= mask;
        open = match (open, visible) {
            (None, true) => {
                let rise = if i == 0 { trajectory[0].epoch } else { crossing(i) };
                Some((rise, el))
            }
            (Some((rise, max_el)), true) => Some((rise, max_el.max(el))),
            (Some((rise, max_el)), false) => {
                windows.push(AccessWindow { rise, set: crossing(i), max_elevation_deg: max_el });
                None
            }
            (None, false) => None,
        };
    }
    if let (Some((rise, max_el)), Some(last)) = (open, trajectory.last()) {
        windows.push(AccessWindow { rise, set: last.epoch, max_elevation_deg: max_el });
    }

    log::debug!("{} access windows over {}", windows.len(), station.name);
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::ForceSet;
    use crate::orbital::elements::OrbitalElements;
    use crate::sim::runner::{propagate, PropagationConfig};
    use chrono::TimeZone;

    #[test]
    fn zenith_pass_has_ninety_degrees() {
        let gs = GroundStation::new("Equator", 0.0, 0.0);
        let sat = geodetic_to_ecef(0.0, 0.0, 500_000.0);
        let la = look_angles(&gs, &sat);
        assert!((la.elevation_deg - 90.0).abs() < 1e-6);
        assert!((la.range_m - 500_000.0).abs() < 1e-3);
    }

    #[test]
    fn azimuth_points_north_and_east() {
        let gs = GroundStation::new("Equator", 0.0, 0.0);
        let north = look_angles(&gs, &geodetic_to_ecef(5.0, 0.0, 500_000.0));
        assert!(north.azimuth_deg < 1e-6 || north.azimuth_deg > 360.0 - 1e-6, "az {}", north.azimuth_deg);
        let east = look_angles(&gs, &geodetic_to_ecef(0.0, 5.0, 500_000.0));
        assert!((east.azimuth_deg - 90.0).abs() < 1e-6);
        assert!(east.elevation_deg > 0.0);
    }

    #[test]
    fn below_horizon_is_negative_elevation() {
        let gs = GroundStation::new("Equator", 0.0, 0.0);
        let la = look_angles(&gs, &geodetic_to_ecef(0.0, 180.0, 500_000.0));
        assert!(la.elevation_deg < -45.0);
    }

    #[test]
    fn one_day_of_passes() {
        let epoch = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();
        let s0 = OrbitalElements::circular(550_000.0, 53f64.to_radians(), 0.0, 0.0, epoch).to_state().unwrap();
        let config = PropagationConfig { step: 30.0, duration: 86_400.0, ..PropagationConfig::default() };
        let traj = propagate(&s0, &ForceSet::two_body(), &config).unwrap();
        let gs = GroundStation::new("Mid-latitude", 40.0, -3.7);
        let windows = compute_access_windows(&traj, &gs);
        assert!(!windows.is_empty(), "a 53 deg shell should pass over 40 deg N daily");
        for w in &windows {
            assert!(w.set > w.rise);
            assert!(w.duration_s() < 1200.0, "LEO pass too long: {} s", w.duration_s());
            assert!(w.max_elevation_deg >= gs.min_elevation_deg && w.max_elevation_deg <= 90.0);
        }
        for pair in windows.windows(2) {
            assert!(pair[1].rise > pair[0].set);
        }
    }

    #[test]
    fn empty_trajectory_has_no_windows() {
        let gs = GroundStation::new("Nowhere", 0.0, 0.0);
        assert!(compute_access_windows(&[], &gs).is_empty());
    }
}

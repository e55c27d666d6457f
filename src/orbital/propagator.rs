use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{MU_EARTH, R_EARTH_MEAN};
use crate::epoch::{add_seconds, seconds_between};
use crate::error::{require_positive, Error, Result};
use crate::orbital::constellation::Satellite;
use crate::orbital::elements::kepler_to_cartesian;

/// Cartesian orbital state in ECI at a UTC epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    pub epoch: DateTime<Utc>,
    pub pos: Vector3<f64>, // m, ECI
    pub vel: Vector3<f64>, // m/s, ECI
}

impl OrbitalState {
    pub fn new(epoch: DateTime<Utc>, pos: Vector3<f64>, vel: Vector3<f64>) -> Self {
        Self { epoch, pos, vel }
    }

    /// Altitude above the mean Earth radius, m.
    pub fn altitude(&self) -> f64 {
        self.pos.norm() - R_EARTH_MEAN
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Specific orbital energy, J/kg.
    pub fn specific_energy(&self) -> f64 {
        0.5 * self.vel.norm_squared() - MU_EARTH / self.pos.norm()
    }

    /// Specific angular momentum vector, m^2/s.
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.pos.cross(&self.vel)
    }
}

// ---------------------------------------------------------------------------
// Analytic circular-orbit mode
// ---------------------------------------------------------------------------

/// Circular-orbit parameters derived from a satellite snapshot.
#[derive(Debug, Clone, Copy)]
pub struct CircularOrbit {
    pub radius: f64,      // m
    pub inc: f64,         // rad
    pub raan: f64,        // rad
    pub mean_motion: f64, // rad/s
    pub ref_anomaly: f64, // argument of latitude at `ref_epoch`, rad
    pub ref_epoch: Option<DateTime<Utc>>,
}

impl CircularOrbit {
    /// Radius from |r|, inclination from r x v, RAAN and anomaly from the
    /// satellite metadata.
    pub fn from_satellite(sat: &Satellite) -> Self {
        let radius = sat.pos.norm();
        let h = sat.pos.cross(&sat.vel);
        let h_mag = h.norm();
        let inc = if h_mag > 0.0 {
            (h.z / h_mag).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };
        CircularOrbit {
            radius,
            inc,
            raan: sat.raan,
            mean_motion: (MU_EARTH / radius.powi(3)).sqrt(),
            ref_anomaly: sat.true_anomaly,
            ref_epoch: sat.epoch,
        }
    }

    /// State at `epoch`. Without a reference epoch, `start` is the reference.
    pub fn state_at(&self, epoch: DateTime<Utc>, start: DateTime<Utc>) -> OrbitalState {
        let reference = self.ref_epoch.unwrap_or(start);
        let nu = self.ref_anomaly + self.mean_motion * seconds_between(reference, epoch);
        let (pos, vel) = kepler_to_cartesian(self.radius, 0.0, self.inc, self.raan, 0.0, nu);
        OrbitalState { epoch, pos, vel }
    }
}

/// Constant-mean-motion propagation of a circular orbit.
///
/// No force model is involved; this is the cheap path used for ground
/// tracks. Points are at `start + k * step` for k = 0..=floor(duration/step).
pub fn propagate_circular(
    sat: &Satellite,
    start: DateTime<Utc>,
    duration: f64,
    step: f64,
) -> Result<Vec<OrbitalState>> {
    require_positive("step", step)?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(Error::InvalidParameter {
            name: "duration",
            value: duration,
            reason: "must be finite and non-negative",
        });
    }

    let orbit = CircularOrbit::from_satellite(sat);
    let n_points = (duration / step + 1e-9).floor() as usize + 1;
    Ok((0..n_points)
        .map(|k| orbit.state_at(add_seconds(start, k as f64 * step), start))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::constellation::{generate_walker_shell, ShellConfig};
    use chrono::TimeZone;
    use std::f64::consts::TAU;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap()
    }

    fn single_sat(inc_deg: f64) -> Satellite {
        let shell = ShellConfig {
            altitude_km: 550.0,
            inclination_deg: inc_deg,
            num_planes: 1,
            sats_per_plane: 1,
            phase_factor: 0,
            raan_offset_deg: 0.0,
            shell_name: "Test".into(),
        };
        generate_walker_shell(&shell).remove(0)
    }

    #[test]
    fn circular_returns_after_one_period() {
        let sat = single_sat(53.0);
        let orbit = CircularOrbit::from_satellite(&sat);
        let period = TAU / orbit.mean_motion;
        let traj = propagate_circular(&sat, start(), period, period / 4.0).unwrap();
        assert_eq!(traj.len(), 5);
        let err = (traj[4].pos - traj[0].pos).norm();
        assert!(err < 1e-3, "closed orbit should return to start, error {:.3e} m", err);
    }

    #[test]
    fn circular_radius_and_speed_constant() {
        let sat = single_sat(97.6);
        let traj = propagate_circular(&sat, start(), 3600.0, 60.0).unwrap();
        let r0 = traj[0].pos.norm();
        let v0 = traj[0].speed();
        for s in &traj {
            assert!((s.pos.norm() - r0).abs() < 1e-6);
            assert!((s.speed() - v0).abs() < 1e-9);
        }
    }

    #[test]
    fn epoch_offset_advances_anomaly() {
        let mut sat = single_sat(53.0);
        sat.epoch = Some(start());
        let orbit = CircularOrbit::from_satellite(&sat);
        let later = add_seconds(start(), 600.0);
        let direct = orbit.state_at(later, later);
        let from_start = propagate_circular(&sat, start(), 600.0, 600.0).unwrap();
        assert!((direct.pos - from_start[1].pos).norm() < 1e-6);
    }

    #[test]
    fn rejects_bad_step() {
        let sat = single_sat(53.0);
        assert!(propagate_circular(&sat, start(), 600.0, 0.0).is_err());
        assert!(propagate_circular(&sat, start(), -1.0, 10.0).is_err());
    }

    #[test]
    fn zero_duration_gives_single_point() {
        let sat = single_sat(53.0);
        assert_eq!(propagate_circular(&sat, start(), 0.0, 60.0).unwrap().len(), 1);
    }
}

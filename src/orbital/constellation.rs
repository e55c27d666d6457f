use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::R_EARTH_MEAN;
use crate::error::{require_positive, Result};
use crate::orbital::elements::{kepler_to_cartesian, sso_inclination};
use crate::orbital::propagator::{CircularOrbit, OrbitalState};

/// A Walker shell, described the way mission planners write it down (degrees, km).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    pub altitude_km: f64,
    pub inclination_deg: f64,
    pub num_planes: usize,
    pub sats_per_plane: usize,
    pub phase_factor: usize,
    pub raan_offset_deg: f64,
    pub shell_name: String,
}

/// A satellite snapshot: identity, ECI state and circular-orbit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    pub name: String,
    pub plane_index: usize,
    pub sat_index: usize,
    pub pos: Vector3<f64>,    // m, ECI
    pub vel: Vector3<f64>,    // m/s, ECI
    pub raan: f64,            // rad
    pub true_anomaly: f64,    // rad (argument of latitude for circular orbits)
    pub epoch: Option<DateTime<Utc>>, // None for synthetic shells
}

impl Satellite {
    /// State at `epoch` on the analytic circular path.
    ///
    /// Synthetic satellites (no epoch) are taken to be at their stored anomaly at `epoch`.
    pub fn state_at(&self, epoch: DateTime<Utc>) -> OrbitalState {
        CircularOrbit::from_satellite(self).state_at(epoch, epoch)
    }
}

/// Walker-delta i:T/P/F shell.
///
/// Plane p has RAAN = offset + 360 p / P; satellite s in that plane sits at
/// 360 s / S + 360 F p / T along-track.
pub fn generate_walker_shell(shell: &ShellConfig) -> Vec<Satellite> {
    let planes = shell.num_planes;
    let per_plane = shell.sats_per_plane;
    let total = planes * per_plane;
    if total == 0 {
        return Vec::new();
    }

    let a = R_EARTH_MEAN + shell.altitude_km * 1000.0;
    let inc = shell.inclination_deg.to_radians();
    let mut sats = Vec::with_capacity(total);

    for p in 0..planes {
        let raan_deg = shell.raan_offset_deg + 360.0 * p as f64 / planes as f64;
        let raan = raan_deg.to_radians();
        for s in 0..per_plane {
            let nu_deg = 360.0 * s as f64 / per_plane as f64
                + 360.0 * (shell.phase_factor * p) as f64 / total as f64;
            let nu = nu_deg.rem_euclid(360.0).to_radians();
            let (pos, vel) = kepler_to_cartesian(a, 0.0, inc, raan, 0.0, nu);
            sats.push(Satellite {
                name: format!("{}-Plane{}-Sat{}", shell.shell_name, p + 1, s + 1),
                plane_index: p,
                sat_index: s,
                pos,
                vel,
                raan,
                true_anomaly: nu,
                epoch: None,
            });
        }
    }

    log::debug!("Generated {} satellites for shell {}", sats.len(), shell.shell_name);
    sats
}

/// Single-plane SSO shells from `start_alt_km` to `end_alt_km` inclusive.
pub fn generate_sso_band_configs(
    start_alt_km: f64,
    end_alt_km: f64,
    step_km: f64,
    sats_per_plane: usize,
) -> Result<Vec<ShellConfig>> {
    require_positive("step_km", step_km)?;
    let mut shells = Vec::new();
    let mut alt = start_alt_km;
    while alt <= end_alt_km + 1e-9 {
        shells.push(ShellConfig {
            altitude_km: alt,
            inclination_deg: sso_inclination(alt)?.to_degrees(),
            num_planes: 1,
            sats_per_plane,
            phase_factor: 0,
            raan_offset_deg: 0.0,
            shell_name: format!("SSO-{:.0}km", alt),
        });
        alt += step_km;
    }
    Ok(shells)
}

use serde::{Deserialize, Serialize};

use crate::constants::{G0, J2_EARTH, MU_EARTH, R_EARTH_EQUATORIAL, R_EARTH_MEAN, SECONDS_PER_YEAR};
use crate::error::{require_positive, Error, Result};
use crate::orbital::maneuvers::{circular_velocity, deorbit_delta_v, hohmann};
use crate::physics::atmosphere::MAX_ALTITUDE_KM;
use crate::physics::drag::{semi_major_axis_decay_rate, DragConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationKeepingConfig {
    pub mission_years: f64,
    pub isp_s: f64,
    pub initial_mass_kg: f64, // wet mass m0 at the start of the mission
    pub inclination_drift_rad_per_year: f64,
    pub raan_drift_rad_per_year: f64,
    pub deorbit_perigee_km: Option<f64>,
    pub reboost_band_km: f64, // altitude lost between reboosts
}

impl Default for StationKeepingConfig {
    fn default() -> Self {
        Self {
            mission_years: 5.0,
            isp_s: 220.0,
            initial_mass_kg: 260.0,
            inclination_drift_rad_per_year: 0.0,
            raan_drift_rad_per_year: 0.0,
            deorbit_perigee_km: Some(50.0),
            reboost_band_km: 5.0,
        }
    }
}

impl StationKeepingConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("mission_years", self.mission_years)?;
        require_positive("isp_s", self.isp_s)?;
        require_positive("initial_mass_kg", self.initial_mass_kg)?;
        require_positive("reboost_band_km", self.reboost_band_km)?;
        for (name, v) in [
            ("inclination_drift_rad_per_year", self.inclination_drift_rad_per_year),
            ("raan_drift_rad_per_year", self.raan_drift_rad_per_year),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidParameter { name, value: v, reason: "must be finite and non-negative" });
            }
        }
        Ok(())
    }
}

/// Delta-V and propellant over the mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationKeepingBudget {
    pub altitude_loss_per_year_km: f64, // uncorrected
    pub drag_dv_per_year: f64,          // m/s
    pub plane_dv_per_year: f64,         // m/s
    pub deorbit_dv: f64,                // m/s
    pub total_dv: f64,                  // m/s
    pub propellant_mass_kg: f64,
}

/// Tsiolkovsky: propellant needed for `delta_v` starting from `initial_mass_kg`.
pub fn propellant_mass(delta_v: f64, initial_mass_kg: f64, isp_s: f64) -> f64 {
    initial_mass_kg * (1.0 - (-delta_v / (isp_s * G0)).exp())
}

/// Secular nodal rate from J2, rad/s.
pub fn j2_raan_rate(a: f64, e: f64, inc: f64) -> f64 {
    let n = (MU_EARTH / a.powi(3)).sqrt();
    let p = a * (1.0 - e * e);
    -1.5 * n * J2_EARTH * (R_EARTH_EQUATORIAL / p).powi(2) * inc.cos()
}

/// Budget for holding a circular orbit of radius `a` at inclination `inc`.
///
/// Drag makeup is priced as repeated Hohmann reboosts across
/// `reboost_band_km`; plane maintenance corrects the configured yearly drifts.
pub fn compute_station_keeping_budget(
    a: f64,
    inc: f64,
    drag: &DragConfig,
    config: &StationKeepingConfig,
) -> Result<StationKeepingBudget> {
    require_positive("semi_major_axis", a)?;
    drag.validate()?;
    config.validate()?;

    let h_km = (a - R_EARTH_MEAN) / 1000.0;
    let decay = if h_km > MAX_ALTITUDE_KM { 0.0 } else { semi_major_axis_decay_rate(a, 0.0, drag)? };
    let loss = -decay * SECONDS_PER_YEAR;
    // one Hohmann reboost each time the orbit has dropped by the band
    let drag_dv = if loss > 0.0 {
        let band = loss.min(config.reboost_band_km * 1000.0);
        loss / band * hohmann(a - band, a).total_dv
    } else {
        0.0
    };

    let v = circular_velocity(a);
    let plane_dv = 2.0 * v * (config.inclination_drift_rad_per_year / 2.0).sin()
        + 2.0 * v * inc.sin() * (config.raan_drift_rad_per_year / 2.0).sin();

    let deorbit_dv = match config.deorbit_perigee_km {
        Some(perigee) => deorbit_delta_v(a, perigee)?,
        None => 0.0,
    };

    let total_dv = (drag_dv + plane_dv) * config.mission_years + deorbit_dv;
    let budget = StationKeepingBudget {
        altitude_loss_per_year_km: loss / 1000.0,
        drag_dv_per_year: drag_dv,
        plane_dv_per_year: plane_dv,
        deorbit_dv,
        total_dv,
        propellant_mass_kg: propellant_mass(total_dv, config.initial_mass_kg, config.isp_s),
    };
    log::debug!("Station keeping at {:.0} km: {:.1} m/s total", h_km, total_dv);
    Ok(budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sat() -> DragConfig {
        DragConfig::new(2.2, 10.0, 260.0).unwrap()
    }

    #[test]
    fn rocket_equation() {
        let m = propellant_mass(100.0, 1000.0, 300.0);
        let expected = 1000.0 * (1.0 - (-100.0_f64 / (300.0 * G0)).exp());
        assert!((m - expected).abs() < 1e-9);
        assert_eq!(propellant_mass(0.0, 1000.0, 300.0), 0.0);
    }

    #[test]
    fn sso_raan_rate_matches_sun() {
        let a = R_EARTH_MEAN + 550_000.0;
        let inc = crate::orbital::elements::sso_inclination(550.0).unwrap();
        let rate = j2_raan_rate(a, 0.0, inc);
        // ~0.9856 deg/day
        let deg_per_day = rate.to_degrees() * 86_400.0;
        assert!((deg_per_day - 0.9856).abs() < 0.02, "nodal rate {:.4} deg/day", deg_per_day);
    }

    #[test]
    fn lower_orbit_costs_more() {
        let cfg = StationKeepingConfig { deorbit_perigee_km: None, ..StationKeepingConfig::default() };
        let low = compute_station_keeping_budget(R_EARTH_MEAN + 400_000.0, 0.9, &sat(), &cfg).unwrap();
        let high = compute_station_keeping_budget(R_EARTH_MEAN + 700_000.0, 0.9, &sat(), &cfg).unwrap();
        assert!(low.drag_dv_per_year > high.drag_dv_per_year);
        assert!(low.total_dv > high.total_dv);
        assert_eq!(low.deorbit_dv, 0.0);
    }

    #[test]
    fn budget_components_add_up() {
        let cfg = StationKeepingConfig {
            raan_drift_rad_per_year: 0.01,
            inclination_drift_rad_per_year: 0.001,
            ..StationKeepingConfig::default()
        };
        let b = compute_station_keeping_budget(R_EARTH_MEAN + 550_000.0, 53f64.to_radians(), &sat(), &cfg).unwrap();
        let expected = (b.drag_dv_per_year + b.plane_dv_per_year) * cfg.mission_years + b.deorbit_dv;
        assert!((b.total_dv - expected).abs() < 1e-9);
        assert!(b.plane_dv_per_year > 0.0 && b.deorbit_dv > 100.0);
        assert!(b.propellant_mass_kg > 0.0 && b.propellant_mass_kg < cfg.initial_mass_kg);
    }

    #[test]
    fn propellant_scales_with_initial_mass() {
        let light = StationKeepingConfig { initial_mass_kg: 100.0, ..StationKeepingConfig::default() };
        let heavy = StationKeepingConfig { initial_mass_kg: 400.0, ..light };
        let a = R_EARTH_MEAN + 550_000.0;
        let bl = compute_station_keeping_budget(a, 0.9, &sat(), &light).unwrap();
        let bh = compute_station_keeping_budget(a, 0.9, &sat(), &heavy).unwrap();
        assert!((bl.propellant_mass_kg - propellant_mass(bl.total_dv, 100.0, light.isp_s)).abs() < 1e-12);
        assert!((bh.propellant_mass_kg / bl.propellant_mass_kg - 4.0).abs() < 1e-9);
        let bad = StationKeepingConfig { initial_mass_kg: 0.0, ..light };
        assert!(compute_station_keeping_budget(a, 0.9, &sat(), &bad).is_err());
    }

    #[test]
    fn no_drag_cost_above_atmosphere() {
        let cfg = StationKeepingConfig { deorbit_perigee_km: None, ..StationKeepingConfig::default() };
        let b = compute_station_keeping_budget(R_EARTH_MEAN + 2_500_000.0, 0.9, &sat(), &cfg).unwrap();
        assert_eq!(b.drag_dv_per_year, 0.0);
        assert_eq!(b.total_dv, 0.0);
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = StationKeepingConfig { isp_s: 0.0, ..StationKeepingConfig::default() };
        assert!(compute_station_keeping_budget(R_EARTH_MEAN + 550_000.0, 0.9, &sat(), &cfg).is_err());
    }
}

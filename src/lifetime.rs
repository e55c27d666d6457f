use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{R_EARTH_MEAN, SECONDS_PER_DAY, SECONDS_PER_YEAR};
use crate::epoch::add_seconds;
use crate::error::{require_positive, Error, Result};
use crate::physics::atmosphere::{MAX_ALTITUDE_KM, MIN_ALTITUDE_KM};
use crate::physics::drag::{semi_major_axis_decay_rate, DragConfig};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeConfig {
    pub step_days: f64,            // longest integration step
    pub max_altitude_drop_km: f64, // per-step altitude loss limit
    pub max_years: f64,            // horizon
    pub reentry_altitude_km: f64,  // lifetime ends here
}

impl Default for LifetimeConfig {
    fn default() -> Self {
        Self {
            step_days: 1.0,
            max_altitude_drop_km: 1.0,
            max_years: 100.0,
            reentry_altitude_km: 120.0,
        }
    }
}

impl LifetimeConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("step_days", self.step_days)?;
        require_positive("max_altitude_drop_km", self.max_altitude_drop_km)?;
        require_positive("max_years", self.max_years)?;
        if !(MIN_ALTITUDE_KM..=MAX_ALTITUDE_KM).contains(&self.reentry_altitude_km) {
            return Err(Error::AltitudeOutOfRange {
                altitude_km: self.reentry_altitude_km,
                min_km: MIN_ALTITUDE_KM,
                max_km: MAX_ALTITUDE_KM,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decay curve
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecayPoint {
    pub epoch: DateTime<Utc>,
    pub elapsed_s: f64,
    pub altitude_km: f64,
    pub sma: f64, // m
}

/// Semi-major-axis history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecayCurve {
    points: Vec<DecayPoint>,
}

impl DecayCurve {
    /// Iterate the curve from the start; may be called any number of times.
    pub fn iter(&self) -> std::slice::Iter<'_, DecayPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&DecayPoint> {
        self.points.last()
    }
}

impl<'a> IntoIterator for &'a DecayCurve {
    type Item = &'a DecayPoint;
    type IntoIter = std::slice::Iter<'a, DecayPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitLifetime {
    pub lifetime_s: f64,
    pub reentered: bool, // false when the horizon was reached first
    pub curve: DecayCurve,
}

impl OrbitLifetime {
    pub fn lifetime_years(&self) -> f64 {
        self.lifetime_s / SECONDS_PER_YEAR
    }
}

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

/// Integrate the drag decay rate from `a` until re-entry or the horizon.
///
/// Above the density table the decay rate is zero and the orbit survives to
/// the horizon.
pub fn compute_orbit_lifetime(
    a: f64,
    e: f64,
    drag: &DragConfig,
    epoch: DateTime<Utc>,
    config: &LifetimeConfig,
) -> Result<OrbitLifetime> {
    require_positive("semi_major_axis", a)?;
    drag.validate()?;
    config.validate()?;

    let horizon = config.max_years * SECONDS_PER_YEAR;
    let max_step = config.step_days * SECONDS_PER_DAY;
    let max_drop = config.max_altitude_drop_km * 1000.0;
    let a_reentry = R_EARTH_MEAN + config.reentry_altitude_km * 1000.0;

    let point = |t: f64, sma: f64| DecayPoint {
        epoch: add_seconds(epoch, t),
        elapsed_s: t,
        altitude_km: (sma - R_EARTH_MEAN) / 1000.0,
        sma,
    };

    let mut t = 0.0;
    let mut sma = a;
    let mut points = vec![point(t, sma)];
    let mut reentered = sma <= a_reentry;

    while !reentered && t < horizon {
        let h_km = (sma - R_EARTH_MEAN) / 1000.0;
        let rate = if h_km > MAX_ALTITUDE_KM {
            0.0
        } else {
            semi_major_axis_decay_rate(sma, e, drag)?
        };
        if rate >= 0.0 {
            t = horizon;
            points.push(point(t, sma));
            break;
        }

        let dt = max_step.min(max_drop / -rate).min(horizon - t);
        let next = sma + rate * dt;
        if next <= a_reentry {
            t += (sma - a_reentry) / -rate;
            sma = a_reentry;
            reentered = true;
        } else {
            t += dt;
            sma = next;
        }
        points.push(point(t, sma));
    }

    log::info!(
        "Lifetime from {:.0} km: {:.2} years ({}, {} points)",
        (a - R_EARTH_MEAN) / 1000.0,
        t / SECONDS_PER_YEAR,
        if reentered { "re-entered" } else { "horizon reached" },
        points.len()
    );

    Ok(OrbitLifetime { lifetime_s: t, reentered, curve: DecayCurve { points } })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::constants::{J2_EARTH, MU_EARTH, R_EARTH_MEAN, SSO_NODAL_RATE};
use crate::error::{Error, Result};
use crate::orbital::propagator::OrbitalState;

/// Below this, eccentricity or node-vector magnitude counts as zero.
const DEGENERACY_EPS: f64 = 1e-11;

/// Classical orbital elements at an epoch.
///
/// `sma` is negative for hyperbolic orbits so that `p = a(1 - e^2)` stays positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub sma: f64,       // semi-major axis, m
    pub ecc: f64,       // eccentricity (0 = circular)
    pub inc: f64,       // inclination, rad [0, pi]
    pub raan: f64,      // right ascension of ascending node, rad
    pub argp: f64,      // argument of perigee, rad
    pub true_anom: f64, // true anomaly, rad
    pub epoch: DateTime<Utc>,
}

impl OrbitalElements {
    /// Circular orbit at `altitude` metres above the mean Earth radius.
    pub fn circular(altitude: f64, inc: f64, raan: f64, true_anom: f64, epoch: DateTime<Utc>) -> Self {
        OrbitalElements {
            sma: R_EARTH_MEAN + altitude,
            ecc: 0.0,
            inc,
            raan,
            argp: 0.0,
            true_anom,
            epoch,
        }
    }

    /// Reject element sets that have no Cartesian counterpart.
    pub fn validate(&self) -> Result<()> {
        let fields = [self.sma, self.ecc, self.inc, self.raan, self.argp, self.true_anom];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidElements("non-finite element".into()));
        }
        if self.ecc < 0.0 {
            return Err(Error::InvalidElements(format!("eccentricity {} < 0", self.ecc)));
        }
        if (self.ecc - 1.0).abs() < 1e-12 {
            return Err(Error::InvalidElements(
                "parabolic orbit has no finite semi-major axis".into(),
            ));
        }
        if self.ecc < 1.0 && self.sma <= 0.0 {
            return Err(Error::InvalidElements(format!(
                "elliptical orbit needs a > 0, got {}",
                self.sma
            )));
        }
        if self.ecc > 1.0 {
            if self.sma >= 0.0 {
                return Err(Error::InvalidElements(format!(
                    "hyperbolic orbit needs a < 0, got {}",
                    self.sma
                )));
            }
            if 1.0 + self.ecc * self.true_anom.cos() <= 0.0 {
                return Err(Error::InvalidElements(format!(
                    "true anomaly {} rad beyond hyperbolic asymptote",
                    self.true_anom
                )));
            }
        }
        Ok(())
    }

    /// Validated conversion to an ECI state at the element epoch.
    pub fn to_state(&self) -> Result<OrbitalState> {
        self.validate()?;
        let (pos, vel) =
            kepler_to_cartesian(self.sma, self.ecc, self.inc, self.raan, self.argp, self.true_anom);
        Ok(OrbitalState { epoch: self.epoch, pos, vel })
    }

    /// Elements of an ECI state.
    pub fn from_state(state: &OrbitalState) -> Self {
        state_vector_to_elements(&state.pos, &state.vel, state.epoch)
    }

    /// Mean motion, rad/s (uses |a| for hyperbolic orbits).
    pub fn mean_motion(&self) -> f64 {
        (MU_EARTH / self.sma.abs().powi(3)).sqrt()
    }

    /// Orbital period (s); infinite for open orbits.
    pub fn period(&self) -> f64 {
        if self.ecc >= 1.0 {
            f64::INFINITY
        } else {
            TAU / self.mean_motion()
        }
    }

    /// Mean anomaly for elliptical orbits, rad in [0, 2pi).
    pub fn mean_anomaly(&self) -> Option<f64> {
        (self.ecc < 1.0).then(|| true_to_mean_anomaly(self.true_anom, self.ecc))
    }

    /// Altitude above the mean radius at the current anomaly (m).
    pub fn altitude(&self) -> f64 {
        let p = self.sma * (1.0 - self.ecc * self.ecc);
        p / (1.0 + self.ecc * self.true_anom.cos()) - R_EARTH_MEAN
    }
}

// ---------------------------------------------------------------------------
// Elements -> state
// ---------------------------------------------------------------------------

/// Keplerian elements to ECI position (m) and velocity (m/s).
///
/// Unchecked: e = 0 (argp ignored by the caller) and i = 0 (raan ignored)
/// are well defined and accepted as-is.
pub fn kepler_to_cartesian(
    a: f64,
    e: f64,
    i: f64,
    raan: f64,
    argp: f64,
    nu: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    kepler_to_cartesian_mu(a, e, i, raan, argp, nu, MU_EARTH)
}

/// [`kepler_to_cartesian`] with an explicit gravitational parameter.
pub fn kepler_to_cartesian_mu(
    a: f64,
    e: f64,
    i: f64,
    raan: f64,
    argp: f64,
    nu: f64,
    mu: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let p = a * (1.0 - e * e); // semi-latus rectum
    let (sin_nu, cos_nu) = nu.sin_cos();
    let r = p / (1.0 + e * cos_nu);

    // Perifocal (PQW)
    let r_pqw = Vector3::new(r * cos_nu, r * sin_nu, 0.0);
    let sqrt_mu_p = (mu / p).sqrt();
    let v_pqw = Vector3::new(-sqrt_mu_p * sin_nu, sqrt_mu_p * (e + cos_nu), 0.0);

    // 3-1-3 rotation (raan, inc, argp) PQW -> ECI
    let (so, co) = raan.sin_cos();
    let (sw, cw) = argp.sin_cos();
    let (si, ci) = i.sin_cos();

    let rot = |v: &Vector3<f64>| -> Vector3<f64> {
        Vector3::new(
            (co * cw - so * sw * ci) * v.x + (-co * sw - so * cw * ci) * v.y,
            (so * cw + co * sw * ci) * v.x + (-so * sw + co * cw * ci) * v.y,
            (sw * si) * v.x + (cw * si) * v.y,
        )
    };

    (rot(&r_pqw), rot(&v_pqw))
}

// ---------------------------------------------------------------------------
// State -> elements
// ---------------------------------------------------------------------------

/// ECI state to orbital elements.
///
/// Fallbacks for undefined angles:
/// - equatorial: raan = 0, argp is the longitude of perigee;
/// - circular: argp = 0, true_anom is the argument of latitude;
/// - circular equatorial: raan = argp = 0, true_anom is the true longitude.
///
/// Retrograde equatorial orbits measure longitudes clockwise so the
/// round trip through [`kepler_to_cartesian`] is exact.
pub fn state_vector_to_elements(pos: &Vector3<f64>, vel: &Vector3<f64>, epoch: DateTime<Utc>) -> OrbitalElements {
    state_vector_to_elements_mu(pos, vel, epoch, MU_EARTH)
}

/// [`state_vector_to_elements`] with an explicit gravitational parameter.
pub fn state_vector_to_elements_mu(
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    epoch: DateTime<Utc>,
    mu: f64,
) -> OrbitalElements {
    let r = pos.norm();
    let v = vel.norm();

    let h = pos.cross(vel);
    let h_mag = h.norm();

    // Node vector k x h
    let n = Vector3::new(-h.y, h.x, 0.0);
    let n_mag = n.norm();

    let e_vec = ((v * v - mu / r) * pos - pos.dot(vel) * vel) / mu;
    let ecc = e_vec.norm();

    let energy = 0.5 * v * v - mu / r;
    let sma = if (ecc - 1.0).abs() < 1e-12 {
        f64::INFINITY
    } else {
        -mu / (2.0 * energy)
    };

    let inc = if h_mag > 0.0 {
        (h.z / h_mag).clamp(-1.0, 1.0).acos()
    } else {
        0.0
    };

    let circular = ecc < DEGENERACY_EPS;
    let equatorial = n_mag < DEGENERACY_EPS * h_mag.max(1.0);
    let retrograde = h.z < 0.0;

    // Angle measured in the orbit plane from `from` to `to`, positive along h.
    let in_plane_angle = |from: &Vector3<f64>, to: &Vector3<f64>| -> f64 {
        if h_mag == 0.0 {
            return 0.0;
        }
        let h_hat = h / h_mag;
        let y = h_hat.dot(&from.cross(to));
        let x = from.dot(to);
        y.atan2(x).rem_euclid(TAU)
    };

    let (raan, argp, true_anom) = match (equatorial, circular) {
        (false, false) => {
            let raan = n.y.atan2(n.x).rem_euclid(TAU);
            (raan, in_plane_angle(&n, &e_vec), in_plane_angle(&e_vec, pos))
        }
        (false, true) => {
            let raan = n.y.atan2(n.x).rem_euclid(TAU);
            (raan, 0.0, in_plane_angle(&n, pos))
        }
        (true, false) => {
            let lon_peri = if retrograde {
                (-e_vec.y.atan2(e_vec.x)).rem_euclid(TAU)
            } else {
                e_vec.y.atan2(e_vec.x).rem_euclid(TAU)
            };
            (0.0, lon_peri, in_plane_angle(&e_vec, pos))
        }
        (true, true) => {
            let true_lon = if retrograde {
                (-pos.y.atan2(pos.x)).rem_euclid(TAU)
            } else {
                pos.y.atan2(pos.x).rem_euclid(TAU)
            };
            (0.0, 0.0, true_lon)
        }
    };

    OrbitalElements { sma, ecc, inc, raan, argp, true_anom, epoch }
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

/// Solve Kepler's equation M = E - e sin E for an elliptical orbit and
/// return the true anomaly in [0, 2pi).
pub fn mean_to_true_anomaly(mean_anom: f64, ecc: f64) -> f64 {
    let m = mean_anom.rem_euclid(TAU);
    let mut ea = if ecc < 0.8 { m } else { PI };
    for _ in 0..50 {
        let f = ea - ecc * ea.sin() - m;
        let step = f / (1.0 - ecc * ea.cos());
        ea -= step;
        if step.abs() < 1e-14 {
            break;
        }
    }
    let (sin_e, cos_e) = ea.sin_cos();
    let nu = ((1.0 - ecc * ecc).sqrt() * sin_e).atan2(cos_e - ecc);
    nu.rem_euclid(TAU)
}

/// True anomaly to mean anomaly (elliptical), rad in [0, 2pi).
pub fn true_to_mean_anomaly(true_anom: f64, ecc: f64) -> f64 {
    let (sin_nu, cos_nu) = true_anom.sin_cos();
    let ea = ((1.0 - ecc * ecc).sqrt() * sin_nu).atan2(ecc + cos_nu);
    (ea - ecc * ea.sin()).rem_euclid(TAU)
}

// ---------------------------------------------------------------------------
// Sun-synchronous inclination
// ---------------------------------------------------------------------------

/// Inclination (rad, retrograde) giving a sun-synchronous nodal rate.
///
/// cos i = -(2 * Omega_dot / (3 * J2 * R^2)) * r^3.5 / sqrt(mu)
pub fn sso_inclination(altitude_km: f64) -> Result<f64> {
    let r = R_EARTH_MEAN + altitude_km * 1000.0;
    let cos_i = -(2.0 * SSO_NODAL_RATE / (3.0 * J2_EARTH * R_EARTH_MEAN * R_EARTH_MEAN))
        * (r.powf(3.5) / MU_EARTH.sqrt());
    if !(-1.0..=1.0).contains(&cos_i) {
        return Err(Error::InvalidParameter {
            name: "altitude_km",
            value: altitude_km,
            reason: "no sun-synchronous inclination exists at this altitude",
        });
    }
    Ok(cos_i.acos())
}

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use chrono::{DateTime, Utc};
use nalgebra::{Matrix2, SymmetricEigen, Vector2};
use serde::Serialize;

use crate::conjunction::bplane::{b_plane, fallback_axes, BPlaneGeometry};
use crate::conjunction::covariance::{regularize, PositionCovariance};
use crate::conjunction::screening::CloseApproach;
use crate::error::{Error, Result};

/// Simpson intervals across the hard-body disk (even).
const SIMPSON_INTERVALS: usize = 200;
/// Gaussian support kept along the first principal axis, in sigmas.
const SIGMA_SPAN: f64 = 8.0;

// ---------------------------------------------------------------------------
// Conjunction event
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityMethod {
    /// Integration over the B-plane normal to the relative velocity.
    EncounterPlane,
    /// Relative velocity vanished; plane normal to the primary's velocity.
    VelocityNormalPlane,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConjunctionEvent {
    pub id_a: String,
    pub id_b: String,
    pub tca: DateTime<Utc>,
    pub miss_distance_m: f64,
    pub b_plane: BPlaneGeometry,
    pub collision_probability: f64,
    pub method: ProbabilityMethod,
    pub hard_body_radius_m: f64,
    pub covariance_a: PositionCovariance,
    pub covariance_b: PositionCovariance,
}

fn check_hard_body_radius(hbr: f64) -> Result<()> {
    if hbr.is_finite() && hbr > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidHardBodyRadius(hbr))
    }
}

// ---------------------------------------------------------------------------
// Probability
// ---------------------------------------------------------------------------

/// Complementary error function (Numerical Recipes `erfcc` Chebyshev fit,
/// fractional error < 1.2e-7 everywhere).
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398 + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * (-z * z + poly).exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// P(a < Z < b) for a standard normal Z, evaluated on the tail that keeps
/// precision.
fn normal_band(a: f64, b: f64) -> f64 {
    if a >= 0.0 {
        0.5 * (erfc(a * FRAC_1_SQRT_2) - erfc(b * FRAC_1_SQRT_2))
    } else if b <= 0.0 {
        0.5 * (erfc(-b * FRAC_1_SQRT_2) - erfc(-a * FRAC_1_SQRT_2))
    } else {
        1.0 - 0.5 * erfc(-a * FRAC_1_SQRT_2) - 0.5 * erfc(b * FRAC_1_SQRT_2)
    }
}

/// Probability that the relative position, Gaussian with mean `miss` and
/// covariance `cov` on the encounter plane, falls inside the disk of radius
/// `hbr` centred on the primary.
///
/// The covariance is regularized, rotated to its principal axes, and the
/// integral taken as an outer Simpson sum over `x = R sin(theta)` of the
/// exact inner strip probability. The result is clamped to [0, 1].
pub fn collision_probability(miss: &Vector2<f64>, cov: &Matrix2<f64>, hbr: f64) -> Result<f64> {
    check_hard_body_radius(hbr)?;
    if !(miss.x.is_finite() && miss.y.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "miss_vector",
            value: miss.norm(),
            reason: "must be finite",
        });
    }
    if cov.iter().any(|v| !v.is_finite()) {
        return Err(Error::MalformedCovariance("encounter covariance is not finite".into()));
    }

    let eig = SymmetricEigen::new(regularize(cov));
    let m = eig.eigenvectors.transpose() * miss;
    let (mx, my) = (m.x, m.y);
    let (sx, sy) = (eig.eigenvalues[0].sqrt(), eig.eigenvalues[1].sqrt());

    let lo = (-hbr).max(mx - SIGMA_SPAN * sx);
    let hi = hbr.min(mx + SIGMA_SPAN * sx);
    if lo >= hi {
        return Ok(0.0);
    }
    let (theta0, theta1) = ((lo / hbr).clamp(-1.0, 1.0).asin(), (hi / hbr).clamp(-1.0, 1.0).asin());

    let norm_x = 1.0 / ((2.0 * PI).sqrt() * sx);
    let integrand = |theta: f64| {
        let (sin_t, cos_t) = theta.sin_cos();
        let x = hbr * sin_t;
        let half_chord = hbr * cos_t;
        let gx = norm_x * (-0.5 * ((x - mx) / sx).powi(2)).exp();
        let strip = normal_band((-half_chord - my) / sy, (half_chord - my) / sy);
        gx * strip * half_chord
    };

    let n = SIMPSON_INTERVALS;
    let h = (theta1 - theta0) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let w = if i % 2 == 1 { 4.0 } else { 2.0 };
            w * integrand(theta0 + i as f64 * h)
        })
        .sum();
    let pc = (integrand(theta0) + integrand(theta1) + interior) * h / 3.0;

    Ok(pc.clamp(0.0, 1.0))
}

/// Covariance-free upper bound: the Pc of the worst-case isotropic
/// covariance (`sigma = miss / sqrt(2)`) in the small-body limit,
/// `R^2 / (e * miss^2)`. Inside the hard body the bound is 1.
pub fn maximum_probability(miss_distance_m: f64, hbr: f64) -> Result<f64> {
    check_hard_body_radius(hbr)?;
    if miss_distance_m <= hbr {
        return Ok(1.0);
    }
    let pc = hbr * hbr / (std::f64::consts::E * miss_distance_m * miss_distance_m);
    Ok(pc.clamp(0.0, 1.0))
}

/// Combine both objects' covariances on the encounter plane and integrate.
pub fn assess_conjunction(
    approach: &CloseApproach,
    covariance_a: &PositionCovariance,
    covariance_b: &PositionCovariance,
    hbr: f64,
) -> Result<ConjunctionEvent> {
    check_hard_body_radius(hbr)?;
    covariance_a.validate()?;
    covariance_b.validate()?;

    let geometry = b_plane(approach);
    let (axis1, axis2, miss, method) = match &geometry {
        BPlaneGeometry::Defined(bp) => (bp.along_axis, bp.cross_axis, bp.miss_vector(), ProbabilityMethod::EncounterPlane),
        BPlaneGeometry::Degenerate { .. } => {
            let (a1, a2) = fallback_axes(approach);
            let dr = approach.relative_pos;
            (a1, a2, Vector2::new(dr.dot(&a1), dr.dot(&a2)), ProbabilityMethod::VelocityNormalPlane)
        }
    };

    let combined = covariance_a.project(&axis1, &axis2) + covariance_b.project(&axis1, &axis2);
    let pc = collision_probability(&miss, &combined, hbr)?;
    log::debug!(
        "{} x {} at {}: miss {:.1} m, Pc {:.3e} ({:?})",
        approach.id_a,
        approach.id_b,
        approach.tca,
        approach.miss_distance_m,
        pc,
        method
    );

    Ok(ConjunctionEvent {
        id_a: approach.id_a.clone(),
        id_b: approach.id_b.clone(),
        tca: approach.tca,
        miss_distance_m: approach.miss_distance_m,
        b_plane: geometry,
        collision_probability: pc,
        method,
        hard_body_radius_m: hbr,
        covariance_a: *covariance_a,
        covariance_b: *covariance_b,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::fmt;
use std::str::FromStr;

use nalgebra::{Vector3, Vector6};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Position (m) stacked over velocity (m/s).
pub type State6 = Vector6<f64>;

pub fn pack(pos: &Vector3<f64>, vel: &Vector3<f64>) -> State6 {
    State6::new(pos.x, pos.y, pos.z, vel.x, vel.y, vel.z)
}

pub fn unpack(y: &State6) -> (Vector3<f64>, Vector3<f64>) {
    (y.fixed_rows::<3>(0).into_owned(), y.fixed_rows::<3>(3).into_owned())
}

// ---------------------------------------------------------------------------
// Integrator selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegratorKind {
    /// Classical fixed-step RK4.
    Rk4,
    /// Adaptive Dormand-Prince 5(4).
    #[default]
    DormandPrince,
}

impl IntegratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            IntegratorKind::Rk4 => "rk4",
            IntegratorKind::DormandPrince => "dormand-prince",
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rk4" => Ok(IntegratorKind::Rk4),
            "dormand-prince" | "dormand_prince" | "dopri5" | "rk45" => Ok(IntegratorKind::DormandPrince),
            _ => Err(Error::UnknownIntegrator(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed-step RK4
// ---------------------------------------------------------------------------

/// Single RK4 step of `dy/dt = f(t, y)`.
pub fn rk4_step<F>(f: &F, t: f64, y: &State6, h: f64) -> Result<State6>
where
    F: Fn(f64, &State6) -> Result<State6>,
{
    let k1 = f(t, y)?;
    let k2 = f(t + 0.5 * h, &(y + k1 * (0.5 * h)))?;
    let k3 = f(t + 0.5 * h, &(y + k2 * (0.5 * h)))?;
    let k4 = f(t + h, &(y + k3 * h))?;
    Ok(y + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (h / 6.0))
}

/// Advance from `t0` to `t1` with RK4 steps no longer than `max_step`.
pub fn rk4_integrate<F>(f: &F, t0: f64, y0: &State6, t1: f64, max_step: f64) -> Result<State6>
where
    F: Fn(f64, &State6) -> Result<State6>,
{
    let span = t1 - t0;
    let n = (span / max_step).ceil().max(1.0) as usize;
    let h = span / n as f64;
    let mut y = *y0;
    for k in 0..n {
        y = rk4_step(f, t0 + k as f64 * h, &y, h)?;
    }
    Ok(y)
}

// ---------------------------------------------------------------------------
// Dormand-Prince 5(4)
// ---------------------------------------------------------------------------

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (also row 7 of the tableau, FSAL)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 5th minus embedded 4th-order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Error tolerances for the adaptive integrator.
#[derive(Debug, Clone, Copy)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
}

pub enum StepResult {
    Accept { y_new: State6, h_next: f64 },
    Reject { h_next: f64 },
}

/// Error norm: worst of position and velocity, each scaled by its own magnitude.
fn error_norm(y: &State6, y_new: &State6, err: &State6, tol: &Tolerances) -> f64 {
    let block = |i: usize| {
        let e = err.fixed_rows::<3>(i).norm();
        let mag = y.fixed_rows::<3>(i).norm().max(y_new.fixed_rows::<3>(i).norm());
        e / (tol.atol + tol.rtol * mag)
    };
    block(0).max(block(3))
}

/// One Dormand-Prince trial step with step-size proposal.
pub fn dopri5_step<F>(f: &F, t: f64, y: &State6, h: f64, tol: &Tolerances) -> Result<StepResult>
where
    F: Fn(f64, &State6) -> Result<State6>,
{
    let k1 = f(t, y)?;
    let k2 = f(t + C2 * h, &(y + h * (A21 * k1)))?;
    let k3 = f(t + C3 * h, &(y + h * (A31 * k1 + A32 * k2)))?;
    let k4 = f(t + C4 * h, &(y + h * (A41 * k1 + A42 * k2 + A43 * k3)))?;
    let k5 = f(t + C5 * h, &(y + h * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4)))?;
    let k6 = f(t + h, &(y + h * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5)))?;
    let y_new = y + h * (B1 * k1 + B3 * k3 + B4 * k4 + B5 * k5 + B6 * k6);
    let k7 = f(t + h, &y_new)?;

    let err = h * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);
    let norm = error_norm(y, &y_new, &err, tol);

    if !norm.is_finite() {
        return Ok(StepResult::Reject { h_next: h * MIN_FACTOR });
    }

    let factor = if norm == 0.0 {
        MAX_FACTOR
    } else {
        (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
    };

    if norm <= 1.0 {
        Ok(StepResult::Accept { y_new, h_next: h * factor })
    } else {
        log::trace!("dopri5 rejected h={:.3e} s (error norm {:.3e})", h, norm);
        Ok(StepResult::Reject { h_next: h * factor.min(1.0) })
    }
}

/// Adaptive integration from `t0` to exactly `t1`.
///
/// `h` is the initial trial step and is updated with the last proposal so
/// consecutive calls continue with a tuned step.
pub fn dopri5_integrate<F>(
    f: &F,
    t0: f64,
    y0: &State6,
    t1: f64,
    h: &mut f64,
    tol: &Tolerances,
    max_substeps: usize,
) -> Result<State6>
where
    F: Fn(f64, &State6) -> Result<State6>,
{
    let mut t = t0;
    let mut y = *y0;
    let min_step = 1e-9 * t1.abs().max(1.0);

    for _ in 0..max_substeps {
        let remaining = t1 - t;
        if remaining <= min_step {
            return Ok(y);
        }
        let trial = h.min(remaining);
        match dopri5_step(f, t, &y, trial, tol)? {
            StepResult::Accept { y_new, h_next } => {
                t = if trial == remaining { t1 } else { t + trial };
                y = y_new;
                // keep the tuned step when the trial was clipped at t1
                *h = if trial < *h { h.max(h_next) } else { h_next };
            }
            StepResult::Reject { h_next } => {
                if h_next < min_step {
                    return Err(Error::IntegrationFailed {
                        elapsed_s: t,
                        reason: format!("step size underflow ({:.3e} s)", h_next),
                    });
                }
                *h = h_next;
            }
        }
    }

    if t1 - t <= min_step {
        Ok(y)
    } else {
        Err(Error::IntegrationFailed {
            elapsed_s: t,
            reason: format!("exceeded {} substeps", max_substeps),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Harmonic oscillator in each axis: x'' = -x, exact solution cos/sin.
    fn oscillator(_t: f64, y: &State6) -> Result<State6> {
        Ok(State6::new(y[3], y[4], y[5], -y[0], -y[1], -y[2]))
    }

    fn start() -> State6 {
        State6::new(1.0, 0.0, 0.5, 0.0, 1.0, 0.0)
    }

    #[test]
    fn parses_integrator_names() {
        assert_eq!("rk4".parse::<IntegratorKind>().unwrap(), IntegratorKind::Rk4);
        assert_eq!("dopri5".parse::<IntegratorKind>().unwrap(), IntegratorKind::DormandPrince);
        assert_eq!("RK45".parse::<IntegratorKind>().unwrap(), IntegratorKind::DormandPrince);
        assert_eq!("dormand-prince".parse::<IntegratorKind>().unwrap(), IntegratorKind::DormandPrince);
        let err = "euler".parse::<IntegratorKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownIntegrator(ref n) if n == "euler"));
        assert_eq!(IntegratorKind::Rk4.to_string(), "rk4");
    }

    #[test]
    fn rk4_tracks_oscillator() {
        let y = rk4_integrate(&oscillator, 0.0, &start(), 10.0, 0.01).unwrap();
        let exact = State6::new(10f64.cos(), 10f64.sin(), 0.5 * 10f64.cos(), -10f64.sin(), 10f64.cos(), -0.5 * 10f64.sin());
        assert!((y - exact).norm() < 1e-8, "RK4 error {:.3e}", (y - exact).norm());
    }

    #[test]
    fn dopri5_lands_on_target_within_tolerance() {
        let tol = Tolerances { rtol: 1e-10, atol: 1e-12 };
        let mut h = 0.5;
        let y = dopri5_integrate(&oscillator, 0.0, &start(), 10.0, &mut h, &tol, 100_000).unwrap();
        let exact = State6::new(10f64.cos(), 10f64.sin(), 0.5 * 10f64.cos(), -10f64.sin(), 10f64.cos(), -0.5 * 10f64.sin());
        assert!((y - exact).norm() < 1e-7, "dopri5 error {:.3e}", (y - exact).norm());
        assert!(h > 0.0);
    }

    #[test]
    fn dopri5_reports_substep_exhaustion() {
        let tol = Tolerances { rtol: 1e-12, atol: 1e-14 };
        let mut h = 1.0;
        let res = dopri5_integrate(&oscillator, 0.0, &start(), 1000.0, &mut h, &tol, 5);
        assert!(matches!(res, Err(Error::IntegrationFailed { .. })));
    }

    #[test]
    fn derivative_errors_propagate() {
        let failing = |_t: f64, _y: &State6| -> Result<State6> { Err(Error::UnknownIntegrator("x".into())) };
        assert!(rk4_step(&failing, 0.0, &start(), 1.0).is_err());
        let tol = Tolerances { rtol: 1e-9, atol: 1e-9 };
        assert!(dopri5_step(&failing, 0.0, &start(), 1.0, &tol).is_err());
    }

    #[test]
    fn pack_unpack_are_inverse() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        let v = Vector3::new(4.0, 5.0, 6.0);
        let (p2, v2) = unpack(&pack(&p, &v));
        assert_eq!(p, p2);
        assert_eq!(v, v2);
    }
}

use serde::{Deserialize, Serialize};

use super::event::{EventDetector, OrbitEvent};
use super::integrator::{dopri5_integrate, pack, rk4_integrate, unpack, IntegratorKind, State6, Tolerances};
use crate::epoch::add_seconds;
use crate::error::{require_positive, Error, Result};
use crate::forces::ForceSet;
use crate::orbital::propagator::OrbitalState;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Numerical propagation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    pub step: f64,              // s, output sampling interval
    pub duration: f64,          // s
    pub integrator: IntegratorKind,
    pub rtol: f64,              // adaptive relative tolerance
    pub atol: f64,              // adaptive absolute tolerance (m, m/s)
    pub max_substeps: usize,    // adaptive trial steps per output interval
    pub fixed_step: f64,        // s, longest RK4 substep
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            step: 60.0,
            duration: 86_400.0,
            integrator: IntegratorKind::DormandPrince,
            rtol: 1e-10,
            atol: 1e-9,
            max_substeps: 10_000,
            fixed_step: 10.0,
        }
    }
}

impl PropagationConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("step", self.step)?;
        require_positive("duration", self.duration)?;
        require_positive("rtol", self.rtol)?;
        require_positive("atol", self.atol)?;
        require_positive("fixed_step", self.fixed_step)?;
        if self.max_substeps == 0 {
            return Err(Error::InvalidParameter {
                name: "max_substeps",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Output offsets from the initial epoch: multiples of `step`, then `duration`.
    pub fn output_times(&self) -> Vec<f64> {
        let n = (self.duration / self.step + 1e-9).floor() as usize;
        let mut times: Vec<f64> = (0..=n).map(|k| k as f64 * self.step).collect();
        let last = n as f64 * self.step;
        if self.duration - last > 1e-9 * self.duration {
            times.push(self.duration);
        } else if let Some(t) = times.last_mut() {
            *t = self.duration;
        }
        times
    }
}

/// Trajectory plus detected events.
#[derive(Debug, Clone, Serialize)]
pub struct Propagation {
    pub trajectory: Vec<OrbitalState>,
    pub events: Vec<OrbitEvent>,
}

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

/// Integrate `initial` under `forces`, sampling at `config.step`.
///
/// Deterministic for identical inputs. A force-model error aborts the run
/// and no partial trajectory is returned.
pub fn propagate(initial: &OrbitalState, forces: &ForceSet, config: &PropagationConfig) -> Result<Vec<OrbitalState>> {
    propagate_with_events(initial, forces, config, &mut []).map(|p| p.trajectory)
}

/// Convenience form selecting the integrator by name.
pub fn propagate_named(
    initial: &OrbitalState,
    duration: f64,
    step: f64,
    forces: &ForceSet,
    integrator: &str,
) -> Result<Vec<OrbitalState>> {
    let integrator: IntegratorKind = integrator.parse()?;
    let config = PropagationConfig { step, duration, integrator, ..PropagationConfig::default() };
    propagate(initial, forces, &config)
}

/// Propagate and run `detectors` on each pair of consecutive samples.
pub fn propagate_with_events(
    initial: &OrbitalState,
    forces: &ForceSet,
    config: &PropagationConfig,
    detectors: &mut [Box<dyn EventDetector>],
) -> Result<Propagation> {
    config.validate()?;
    log::debug!(
        "Propagating {:.0} s at {:.1} s output step with {} [{}]",
        config.duration,
        config.step,
        config.integrator,
        forces.model_names().join(", ")
    );

    let epoch0 = initial.epoch;
    let deriv = |t: f64, y: &State6| -> Result<State6> {
        let (pos, vel) = unpack(y);
        let acc = forces.total_acceleration(add_seconds(epoch0, t), &pos, &vel)?;
        Ok(pack(&vel, &acc))
    };

    let tol = Tolerances { rtol: config.rtol, atol: config.atol };
    let times = config.output_times();
    let mut trajectory = Vec::with_capacity(times.len());
    let mut events = Vec::new();
    let mut y = pack(&initial.pos, &initial.vel);
    let mut h = config.step.min(config.fixed_step.max(config.step / 10.0));
    trajectory.push(*initial);

    for pair in times.windows(2) {
        let (t0, t1) = (pair[0], pair[1]);
        y = match config.integrator {
            IntegratorKind::Rk4 => rk4_integrate(&deriv, t0, &y, t1, config.fixed_step)?,
            IntegratorKind::DormandPrince => {
                dopri5_integrate(&deriv, t0, &y, t1, &mut h, &tol, config.max_substeps)?
            }
        };
        if !y.iter().all(|v| v.is_finite()) {
            return Err(Error::IntegrationFailed {
                elapsed_s: t1,
                reason: "state became non-finite".into(),
            });
        }

        let (pos, vel) = unpack(&y);
        let state = OrbitalState::new(add_seconds(epoch0, t1), pos, vel);
        if let Some(prev) = trajectory.last() {
            for det in detectors.iter_mut() {
                if let Some(ev) = det.check(prev, &state) {
                    events.push(ev);
                }
            }
        }
        trajectory.push(state);
    }

    Ok(Propagation { trajectory, events })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::epoch::{add_seconds, seconds_between};
use crate::error::{require_positive, Error, Result};
use crate::orbital::propagator::OrbitalState;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub threshold_m: f64,        // report minima at or below this range
    pub tca_tolerance_s: f64,    // refinement bracket width
    pub subdivisions: usize,     // Hermite sub-samples per coarse segment
    pub hard_body_radius_m: f64, // combined radius used for Pc
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            threshold_m: 10_000.0,
            tca_tolerance_s: 1e-3,
            subdivisions: 16,
            hard_body_radius_m: 20.0,
        }
    }
}

impl ScreeningConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("threshold_m", self.threshold_m)?;
        require_positive("tca_tolerance_s", self.tca_tolerance_s)?;
        if self.subdivisions == 0 {
            return Err(Error::non_positive("subdivisions", 0.0));
        }
        if !(self.hard_body_radius_m.is_finite() && self.hard_body_radius_m > 0.0) {
            return Err(Error::InvalidHardBodyRadius(self.hard_body_radius_m));
        }
        Ok(())
    }
}

/// Refined local minimum of the range between two objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseApproach {
    pub id_a: String,
    pub id_b: String,
    pub tca: DateTime<Utc>,
    pub miss_distance_m: f64,
    pub relative_pos: Vector3<f64>, // b - a, m
    pub relative_vel: Vector3<f64>, // b - a, m/s
    pub state_a: OrbitalState,
    pub state_b: OrbitalState,
}

/// Screening outcome of one pair in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScreening {
    pub id_a: String,
    pub id_b: String,
    pub result: Result<Vec<CloseApproach>>,
}

// ---------------------------------------------------------------------------
// Hermite interpolation on a sampled trajectory
// ---------------------------------------------------------------------------

/// Cubic Hermite position and velocity between two samples `h` seconds apart,
/// at normalized time `s` in [0, 1].
fn hermite(p0: &Vector3<f64>, v0: &Vector3<f64>, p1: &Vector3<f64>, v1: &Vector3<f64>, h: f64, s: f64) -> (Vector3<f64>, Vector3<f64>) {
    let (s2, s3) = (s * s, s * s * s);
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    let d00 = 6.0 * s2 - 6.0 * s;
    let d10 = 3.0 * s2 - 4.0 * s + 1.0;
    let d01 = -6.0 * s2 + 6.0 * s;
    let d11 = 3.0 * s2 - 2.0 * s;

    let pos = p0 * h00 + v0 * (h10 * h) + p1 * h01 + v1 * (h11 * h);
    let vel = (p0 * d00 + v0 * (d10 * h) + p1 * d01 + v1 * (d11 * h)) / h;
    (pos, vel)
}

/// Aligned pair of trajectories with sample times relative to the first epoch.
struct Encounter<'a> {
    a: &'a [OrbitalState],
    b: &'a [OrbitalState],
    times: Vec<f64>,
}

impl<'a> Encounter<'a> {
    fn new(a: &'a [OrbitalState], b: &'a [OrbitalState]) -> Result<Self> {
        if a.len() != b.len() {
            return Err(Error::MisalignedTrajectories(format!("{} vs {} samples", a.len(), b.len())));
        }
        if a.len() < 2 {
            return Err(Error::MisalignedTrajectories(format!("need at least 2 samples, got {}", a.len())));
        }
        if let Some(k) = a.iter().zip(b).position(|(sa, sb)| sa.epoch != sb.epoch) {
            return Err(Error::MisalignedTrajectories(format!(
                "sample {} at {} vs {}",
                k, a[k].epoch, b[k].epoch
            )));
        }
        let t0 = a[0].epoch;
        let times: Vec<f64> = a.iter().map(|s| seconds_between(t0, s.epoch)).collect();
        if let Some(k) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::MisalignedTrajectories(format!("epochs not increasing at sample {}", k + 1)));
        }
        Ok(Self { a, b, times })
    }

    fn segment(&self, t: f64) -> usize {
        let k = self.times.partition_point(|&tk| tk <= t);
        k.clamp(1, self.times.len() - 1) - 1
    }

    fn interpolate(traj: &[OrbitalState], times: &[f64], k: usize, t: f64) -> (Vector3<f64>, Vector3<f64>) {
        let h = times[k + 1] - times[k];
        let s = ((t - times[k]) / h).clamp(0.0, 1.0);
        let (s0, s1) = (&traj[k], &traj[k + 1]);
        hermite(&s0.pos, &s0.vel, &s1.pos, &s1.vel, h, s)
    }

    /// Interpolated states of both objects at `t` seconds.
    fn states_at(&self, t: f64) -> ((Vector3<f64>, Vector3<f64>), (Vector3<f64>, Vector3<f64>)) {
        let k = self.segment(t);
        (
            Self::interpolate(self.a, &self.times, k, t),
            Self::interpolate(self.b, &self.times, k, t),
        )
    }

    fn relative_at(&self, t: f64) -> (Vector3<f64>, Vector3<f64>) {
        let ((pa, va), (pb, vb)) = self.states_at(t);
        (pb - pa, vb - va)
    }

    fn distance_at(&self, t: f64) -> f64 {
        self.relative_at(t).0.norm()
    }

    fn range_rate_at(&self, t: f64) -> f64 {
        let (dr, dv) = self.relative_at(t);
        dr.dot(&dv)
    }

    fn sample_distance(&self, k: usize) -> f64 {
        (self.b[k].pos - self.a[k].pos).norm()
    }
}

// ---------------------------------------------------------------------------
// Refinement
// ---------------------------------------------------------------------------

const GOLDEN: f64 = 0.618_033_988_749_894_9;

fn bisect_range_rate(enc: &Encounter, mut lo: f64, mut hi: f64, tol: f64) -> f64 {
    while hi - lo > tol {
        let mid = 0.5 * (lo + hi);
        if enc.range_rate_at(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    // secant step across the final bracket
    let (g_lo, g_hi) = (enc.range_rate_at(lo), enc.range_rate_at(hi));
    if g_hi > g_lo {
        (lo - g_lo * (hi - lo) / (g_hi - g_lo)).clamp(lo, hi)
    } else {
        0.5 * (lo + hi)
    }
}

fn golden_section(enc: &Encounter, mut lo: f64, mut hi: f64, tol: f64) -> f64 {
    let mut x1 = hi - GOLDEN * (hi - lo);
    let mut x2 = lo + GOLDEN * (hi - lo);
    let mut f1 = enc.distance_at(x1);
    let mut f2 = enc.distance_at(x2);
    while hi - lo > tol {
        if f1 <= f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - GOLDEN * (hi - lo);
            f1 = enc.distance_at(x1);
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + GOLDEN * (hi - lo);
            f2 = enc.distance_at(x2);
        }
    }
    // the bracket ends may still beat the interior at a boundary minimum
    [lo, 0.5 * (lo + hi), hi]
        .into_iter()
        .min_by(|x, y| enc.distance_at(*x).total_cmp(&enc.distance_at(*y)))
        .unwrap_or(lo)
}

/// Global minimum of the interpolated range over `[t_lo, t_hi]`.
fn refine(enc: &Encounter, t_lo: f64, t_hi: f64, config: &ScreeningConfig) -> f64 {
    // sub-sample every coarse segment in the interval
    let mut grid = Vec::new();
    let (k_lo, k_hi) = (enc.segment(t_lo), enc.segment(t_hi));
    for k in k_lo..=k_hi {
        let (a, b) = (enc.times[k].max(t_lo), enc.times[k + 1].min(t_hi));
        if b <= a {
            continue;
        }
        for j in 0..config.subdivisions {
            grid.push(a + (b - a) * j as f64 / config.subdivisions as f64);
        }
    }
    grid.push(t_hi);

    let j = grid
        .iter()
        .enumerate()
        .min_by(|(_, x), (_, y)| enc.distance_at(**x).total_cmp(&enc.distance_at(**y)))
        .map(|(j, _)| j)
        .unwrap_or(0);
    let lo = grid[j.saturating_sub(1)];
    let hi = grid[(j + 1).min(grid.len() - 1)];

    if enc.range_rate_at(lo) < 0.0 && enc.range_rate_at(hi) > 0.0 {
        bisect_range_rate(enc, lo, hi, config.tca_tolerance_s)
    } else {
        golden_section(enc, lo, hi, config.tca_tolerance_s)
    }
}

/// Indices of coarse samples that are local minima of the range.
///
/// A plateau of equal distances yields no candidate. The first and last
/// samples are candidates so a true minimum inside the edge segments is
/// still refined; `screen_pair` discards refinements that stay on the
/// window boundary.
fn coarse_minima(enc: &Encounter) -> Vec<usize> {
    let n = enc.times.len();
    let d: Vec<f64> = (0..n).map(|k| enc.sample_distance(k)).collect();
    (0..n)
        .filter(|&k| {
            let left = match k {
                0 => true,
                k if k == n - 1 => d[k] < d[k - 1],
                k => d[k] <= d[k - 1],
            };
            let right = k == n - 1 || d[k] < d[k + 1];
            left && right
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Screening
// ---------------------------------------------------------------------------

/// Close approaches between two trajectories sampled on the same epochs.
///
/// Every coarse local minimum is refined on its own interval; minima are
/// never merged and those above `threshold_m` are dropped. A minimum that
/// refines onto the first or last epoch is where the window was cut while
/// the range was still changing, not a closest approach, and is not reported.
pub fn screen_pair(
    id_a: &str,
    traj_a: &[OrbitalState],
    id_b: &str,
    traj_b: &[OrbitalState],
    config: &ScreeningConfig,
) -> Result<Vec<CloseApproach>> {
    config.validate()?;
    let enc = Encounter::new(traj_a, traj_b)?;
    let t0 = traj_a[0].epoch;
    let last = enc.times.len() - 1;

    let mut approaches = Vec::new();
    for k in coarse_minima(&enc) {
        let t_lo = enc.times[k.saturating_sub(1)];
        let t_hi = enc.times[(k + 1).min(last)];
        let t = refine(&enc, t_lo, t_hi, config);
        if t <= enc.times[0] + config.tca_tolerance_s || t >= enc.times[last] - config.tca_tolerance_s {
            log::trace!("{} x {}: minimum at window edge t = {:.3} s skipped", id_a, id_b, t);
            continue;
        }

        let ((pa, va), (pb, vb)) = enc.states_at(t);
        let miss = (pb - pa).norm();
        if miss > config.threshold_m {
            continue;
        }
        let tca = add_seconds(t0, t);
        approaches.push(CloseApproach {
            id_a: id_a.to_string(),
            id_b: id_b.to_string(),
            tca,
            miss_distance_m: miss,
            relative_pos: pb - pa,
            relative_vel: vb - va,
            state_a: OrbitalState::new(tca, pa, va),
            state_b: OrbitalState::new(tca, pb, vb),
        });
    }

    log::debug!("{} x {}: {} close approaches", id_a, id_b, approaches.len());
    Ok(approaches)
}

/// Screen every unordered pair. A malformed pair reports its own error and
/// does not stop the batch.
pub fn screen_pairs(trajectories: &[(String, Vec<OrbitalState>)], config: &ScreeningConfig) -> Vec<PairScreening> {
    let mut results = Vec::new();
    for (i, (id_a, traj_a)) in trajectories.iter().enumerate() {
        for (id_b, traj_b) in &trajectories[i + 1..] {
            results.push(PairScreening {
                id_a: id_a.clone(),
                id_b: id_b.clone(),
                result: screen_pair(id_a, traj_a, id_b, traj_b, config),
            });
        }
    }

    let approaches: usize = results.iter().filter_map(|p| p.result.as_ref().ok()).map(Vec::len).sum();
    let failed = results.iter().filter(|p| p.result.is_err()).count();
    log::info!(
        "Screened {} objects ({} pairs): {} close approaches, {} failed pairs",
        trajectories.len(),
        results.len(),
        approaches,
        failed
    );
    results
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::ForceSet;
    use crate::orbital::elements::OrbitalElements;
    use crate::sim::runner::{propagate, PropagationConfig};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
    }

    /// Straight-line trajectory `pos(t) = p + v (t - t_ref)`.
    fn line(p: Vector3<f64>, v: Vector3<f64>, t_ref: f64, n: usize, step: f64) -> Vec<OrbitalState> {
        (0..n)
            .map(|k| {
                let t = k as f64 * step;
                OrbitalState::new(add_seconds(t0(), t), p + v * (t - t_ref), v)
            })
            .collect()
    }

    fn crossing_pair() -> (Vec<OrbitalState>, Vec<OrbitalState>) {
        let a = line(Vector3::new(7.0e6, 0.0, 0.0), Vector3::new(0.0, 7500.0, 0.0), 1234.5, 51, 60.0);
        let b = line(Vector3::new(7.0e6 + 250.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 7500.0), 1234.5, 51, 60.0);
        (a, b)
    }

    #[test]
    fn constructed_crossing_is_refined() {
        let (a, b) = crossing_pair();
        let found = screen_pair("A", &a, "B", &b, &ScreeningConfig::default()).unwrap();
        assert_eq!(found.len(), 1, "expected one approach, got {:?}", found);
        let ca = &found[0];
        let dt = seconds_between(t0(), ca.tca);
        assert!((dt - 1234.5).abs() < 1e-2, "TCA at {} s", dt);
        assert!((ca.miss_distance_m - 250.0).abs() < 1e-2, "miss {}", ca.miss_distance_m);
        assert!((ca.relative_pos.norm() - ca.miss_distance_m).abs() < 1e-9);
        assert!(ca.relative_pos.dot(&ca.relative_vel).abs() / ca.relative_vel.norm() < 1.0);
        assert_eq!(ca.state_a.epoch, ca.tca);
        assert_eq!((ca.id_a.as_str(), ca.id_b.as_str()), ("A", "B"));
    }

    #[test]
    fn threshold_drops_distant_minimum() {
        let (a, b) = crossing_pair();
        let cfg = ScreeningConfig { threshold_m: 200.0, ..ScreeningConfig::default() };
        assert!(screen_pair("A", &a, "B", &b, &cfg).unwrap().is_empty());
    }

    #[test]
    fn node_crossing_between_propagated_orbits() {
        let t_c = 1800.0;
        let setup = |alt: f64, inc_deg: f64| {
            let probe = OrbitalElements::circular(alt, inc_deg.to_radians(), 0.0, 0.0, t0());
            let u0 = -probe.mean_motion() * t_c;
            OrbitalElements::circular(alt, inc_deg.to_radians(), 0.0, u0, t0()).to_state().unwrap()
        };
        let config = PropagationConfig { step: 30.0, duration: 3600.0, ..PropagationConfig::default() };
        let forces = ForceSet::two_body();
        let a = propagate(&setup(550_000.0, 53.0), &forces, &config).unwrap();
        let b = propagate(&setup(550_500.0, 97.6), &forces, &config).unwrap();

        let found = screen_pair("shell", &a, "sso", &b, &ScreeningConfig::default()).unwrap();
        assert_eq!(found.len(), 1, "expected one approach, got {}", found.len());
        let ca = &found[0];
        let dt = seconds_between(t0(), ca.tca);
        assert!((ca.miss_distance_m - 500.0).abs() < 1.0, "miss {:.3} m", ca.miss_distance_m);
        assert!((dt - t_c).abs() < 0.1, "TCA {:.4} s", dt);
    }

    #[test]
    fn parallel_motion_reports_nothing() {
        let v = Vector3::new(0.0, 7500.0, 0.0);
        let a = line(Vector3::new(7.0e6, 0.0, 0.0), v, 0.0, 10, 60.0);
        let b = line(Vector3::new(7.0e6, 0.0, 100.0), v, 0.0, 10, 60.0);
        assert!(screen_pair("A", &a, "B", &b, &ScreeningConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn window_edges_are_not_closest_approaches() {
        // separating at 1 m/s from 100 m: smallest range at the first sample
        let a = line(Vector3::new(7.0e6, 0.0, 0.0), Vector3::zeros(), 0.0, 10, 60.0);
        let diverging = line(Vector3::new(7.0e6 + 100.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), 0.0, 10, 60.0);
        let found = screen_pair("A", &a, "B", &diverging, &ScreeningConfig::default()).unwrap();
        assert!(found.is_empty(), "diverging pair reported {:?}", found);

        // closing at 1 m/s: smallest range at the last sample
        let converging = line(Vector3::new(7.0e6 + 1000.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0), 0.0, 10, 60.0);
        let found = screen_pair("A", &a, "B", &converging, &ScreeningConfig::default()).unwrap();
        assert!(found.is_empty(), "converging pair reported {:?}", found);
    }

    #[test]
    fn minimum_in_first_segment_is_still_found() {
        // closest approach 20 s after the first sample, which is the smaller coarse range
        let a = line(Vector3::new(7.0e6, 0.0, 0.0), Vector3::new(0.0, 7500.0, 0.0), 20.0, 10, 60.0);
        let b = line(Vector3::new(7.0e6 + 300.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 7500.0), 20.0, 10, 60.0);
        let found = screen_pair("A", &a, "B", &b, &ScreeningConfig::default()).unwrap();
        assert_eq!(found.len(), 1, "expected one approach, got {:?}", found);
        assert!((seconds_between(t0(), found[0].tca) - 20.0).abs() < 1e-2);
        assert!((found[0].miss_distance_m - 300.0).abs() < 1e-2);
    }

    #[test]
    fn deeper_of_two_dips_in_one_interval_wins() {
        // relative motion is quadratic in time so the Hermite segments reproduce it
        // exactly: x = K (u - 1/4)(u - 3/4), z = 200 u with u = (t - 60) / 60,
        // giving dips of about 50 m (t = 75 s) and 150 m (t = 105 s) between two
        // coarse samples.
        let k = 1.0e4;
        let origin = Vector3::new(7.0e6, 0.0, 0.0);
        let a: Vec<OrbitalState> = (0..4)
            .map(|i| OrbitalState::new(add_seconds(t0(), i as f64 * 60.0), origin, Vector3::zeros()))
            .collect();
        let b: Vec<OrbitalState> = (0..4)
            .map(|i| {
                let u = i as f64 - 1.0;
                let rel = Vector3::new(k * (u - 0.25) * (u - 0.75), 0.0, 200.0 * u);
                let rate = Vector3::new(k * (2.0 * u - 1.0), 0.0, 200.0) / 60.0;
                OrbitalState::new(add_seconds(t0(), i as f64 * 60.0), origin + rel, rate)
            })
            .collect();

        let found = screen_pair("A", &a, "B", &b, &ScreeningConfig::default()).unwrap();
        assert_eq!(found.len(), 1, "expected only the deeper dip, got {:?}", found);
        let dt = seconds_between(t0(), found[0].tca);
        assert!((dt - 75.0).abs() < 0.1, "TCA at {:.4} s", dt);
        assert!((found[0].miss_distance_m - 50.0).abs() < 0.5, "miss {:.3} m", found[0].miss_distance_m);
    }

    #[test]
    fn hyperbolic_flyby_is_screened_and_assessed() {
        use crate::conjunction::covariance::PositionCovariance;
        use crate::conjunction::probability::assess_conjunction;

        // escape trajectory through perigee at t = 1800 s, crossing a LEO circular orbit's path
        let t_c = 1800.0;
        let rp = crate::constants::R_EARTH_MEAN + 550_000.0;
        let v_hyp = (2.0 * crate::constants::MU_EARTH / rp).sqrt() * 1.2;
        let flyby = OrbitalState::new(
            add_seconds(t0(), t_c),
            Vector3::new(rp + 300.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, v_hyp),
        );
        let leo = OrbitalElements::circular(550_000.0, 0.0, 0.0, 0.0, t0());
        let u0 = -leo.mean_motion() * t_c;
        let leo_start = OrbitalElements::circular(550_000.0, 0.0, 0.0, u0, t0()).to_state().unwrap();

        let config = PropagationConfig { step: 30.0, duration: 3600.0, ..PropagationConfig::default() };
        let back = PropagationConfig { duration: t_c, ..config };
        let forces = ForceSet::two_body();
        // start the flyby from its state 1800 s before perigee by propagating a mirrored copy
        let mirrored = OrbitalState::new(t0(), flyby.pos, -flyby.vel);
        let pre = propagate(&mirrored, &forces, &back).unwrap();
        let start = pre.last().unwrap();
        let flyby_start = OrbitalState::new(t0(), start.pos, -start.vel);
        assert!(OrbitalElements::from_state(&flyby_start).ecc > 1.0);

        let a = propagate(&leo_start, &forces, &config).unwrap();
        let b = propagate(&flyby_start, &forces, &config).unwrap();
        let found = screen_pair("leo", &a, "flyby", &b, &ScreeningConfig::default()).unwrap();
        assert_eq!(found.len(), 1, "expected one approach, got {}", found.len());
        let ca = &found[0];
        assert!((seconds_between(t0(), ca.tca) - t_c).abs() < 0.5, "TCA {:?}", ca.tca);
        assert!((ca.miss_distance_m - 300.0).abs() < 5.0, "miss {:.3} m", ca.miss_distance_m);

        let cov = PositionCovariance::from_row_slice(&[1.0e4, 0.0, 0.0, 0.0, 1.0e4, 0.0, 0.0, 0.0, 1.0e4]).unwrap();
        let event = assess_conjunction(ca, &cov, &cov, 20.0).unwrap();
        assert!(event.collision_probability.is_finite());
        assert!((0.0..=1.0).contains(&event.collision_probability));
    }

    #[test]
    fn misaligned_trajectories_are_rejected() {
        let (a, b) = crossing_pair();
        let short = screen_pair("A", &a, "B", &b[..10], &ScreeningConfig::default());
        assert!(matches!(short, Err(Error::MisalignedTrajectories(_))));

        let shifted: Vec<OrbitalState> = b
            .iter()
            .map(|s| OrbitalState::new(add_seconds(s.epoch, 1.0), s.pos, s.vel))
            .collect();
        let res = screen_pair("A", &a, "B", &shifted, &ScreeningConfig::default());
        assert!(matches!(res, Err(Error::MisalignedTrajectories(_))));

        let single = screen_pair("A", &a[..1], "B", &b[..1], &ScreeningConfig::default());
        assert!(matches!(single, Err(Error::MisalignedTrajectories(_))));
    }

    #[test]
    fn batch_isolates_bad_pairs() {
        let (a, b) = crossing_pair();
        let objects = vec![
            ("A".to_string(), a),
            ("B".to_string(), b.clone()),
            ("C".to_string(), b[..5].to_vec()),
        ];
        let results = screen_pairs(&objects, &ScreeningConfig::default());
        assert_eq!(results.len(), 3);
        let ab = results.iter().find(|p| p.id_a == "A" && p.id_b == "B").unwrap();
        assert_eq!(ab.result.as_ref().map(Vec::len), Ok(1));
        assert_eq!(results.iter().filter(|p| p.result.is_err()).count(), 2);
    }

    #[test]
    fn rejects_bad_config() {
        let (a, b) = crossing_pair();
        let cfg = ScreeningConfig { subdivisions: 0, ..ScreeningConfig::default() };
        assert!(screen_pair("A", &a, "B", &b, &cfg).is_err());
        let cfg = ScreeningConfig { hard_body_radius_m: 0.0, ..ScreeningConfig::default() };
        assert!(matches!(screen_pair("A", &a, "B", &b, &cfg), Err(Error::InvalidHardBodyRadius(_))));
    }
}

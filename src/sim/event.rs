use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::Serialize;

use crate::epoch::{add_seconds, seconds_between};
use crate::orbital::propagator::OrbitalState;

// ---------------------------------------------------------------------------
// Orbit events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EventKind {
    AscendingNode,
    DescendingNode,
    Apogee,
    Perigee,
    AltitudeCrossing { altitude_km: f64, ascending: bool },
}

/// An event located between two output samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitEvent {
    pub epoch: DateTime<Utc>,
    pub kind: EventKind,
    pub pos: Vector3<f64>, // m, ECI, linearly interpolated
}

impl OrbitEvent {
    /// Event at the zero of a function that is `g0` at `prev` and `g1` at `current`.
    fn interpolated(kind: EventKind, prev: &OrbitalState, current: &OrbitalState, g0: f64, g1: f64) -> Self {
        let frac = if g1 != g0 { (g0 / (g0 - g1)).clamp(0.0, 1.0) } else { 0.0 };
        let span = seconds_between(prev.epoch, current.epoch);
        OrbitEvent {
            epoch: add_seconds(prev.epoch, frac * span),
            kind,
            pos: prev.pos + (current.pos - prev.pos) * frac,
        }
    }
}

/// Passive detector run on consecutive propagation samples.
pub trait EventDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<OrbitEvent>;
}

/// Equator crossings (sign change of z).
pub struct NodeDetector;

impl EventDetector for NodeDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<OrbitEvent> {
        let (z0, z1) = (prev.pos.z, current.pos.z);
        let kind = if z0 < 0.0 && z1 >= 0.0 {
            EventKind::AscendingNode
        } else if z0 > 0.0 && z1 <= 0.0 {
            EventKind::DescendingNode
        } else {
            return None;
        };
        Some(OrbitEvent::interpolated(kind, prev, current, z0, z1))
    }
}

/// Apsis passages (sign change of radial velocity r.v).
pub struct ApsisDetector;

impl EventDetector for ApsisDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<OrbitEvent> {
        let g0 = prev.pos.dot(&prev.vel);
        let g1 = current.pos.dot(&current.vel);
        let kind = if g0 > 0.0 && g1 <= 0.0 {
            EventKind::Apogee
        } else if g0 < 0.0 && g1 >= 0.0 {
            EventKind::Perigee
        } else {
            return None;
        };
        Some(OrbitEvent::interpolated(kind, prev, current, g0, g1))
    }
}

/// Altitude threshold crossing in one direction; fires once.
pub struct AltitudeDetector {
    pub altitude_km: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude_km: f64, ascending: bool) -> Self {
        Self { altitude_km, ascending, fired: false }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &OrbitalState, current: &OrbitalState) -> Option<OrbitEvent> {
        if self.fired {
            return None;
        }
        let threshold = self.altitude_km * 1000.0;
        let g0 = prev.altitude() - threshold;
        let g1 = current.altitude() - threshold;
        let crossed = if self.ascending {
            g0 < 0.0 && g1 >= 0.0
        } else {
            g0 > 0.0 && g1 <= 0.0
        };
        if !crossed {
            return None;
        }
        self.fired = true;
        let kind = EventKind::AltitudeCrossing { altitude_km: self.altitude_km, ascending: self.ascending };
        Some(OrbitEvent::interpolated(kind, prev, current, g0, g1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::R_EARTH_MEAN;
    use chrono::TimeZone;

    fn make_state(t: f64, pos: Vector3<f64>, vel: Vector3<f64>) -> OrbitalState {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        OrbitalState::new(add_seconds(t0, t), pos, vel)
    }

    #[test]
    fn ascending_node_interpolated() {
        let r = R_EARTH_MEAN + 500_000.0;
        let prev = make_state(0.0, Vector3::new(r, 0.0, -1000.0), Vector3::new(0.0, 5000.0, 5000.0));
        let curr = make_state(10.0, Vector3::new(r, 0.0, 3000.0), Vector3::new(0.0, 5000.0, 5000.0));
        let ev = NodeDetector.check(&prev, &curr).unwrap();
        assert_eq!(ev.kind, EventKind::AscendingNode);
        let dt = seconds_between(prev.epoch, ev.epoch);
        assert!((dt - 2.5).abs() < 1e-6, "node at {} s", dt);
        assert!(ev.pos.z.abs() < 1e-6);
    }

    #[test]
    fn no_node_without_sign_change() {
        let r = R_EARTH_MEAN + 500_000.0;
        let prev = make_state(0.0, Vector3::new(r, 0.0, 100.0), Vector3::zeros());
        let curr = make_state(10.0, Vector3::new(r, 0.0, 300.0), Vector3::zeros());
        assert!(NodeDetector.check(&prev, &curr).is_none());
    }

    #[test]
    fn apogee_detected() {
        let r = R_EARTH_MEAN + 500_000.0;
        let prev = make_state(0.0, Vector3::new(r, 0.0, 0.0), Vector3::new(10.0, 7600.0, 0.0));
        let curr = make_state(10.0, Vector3::new(r, 0.0, 0.0), Vector3::new(-10.0, 7600.0, 0.0));
        assert_eq!(ApsisDetector.check(&prev, &curr).unwrap().kind, EventKind::Apogee);
    }

    #[test]
    fn altitude_detector_fires_once() {
        let mut det = AltitudeDetector::new(400.0, false);
        let prev = make_state(0.0, Vector3::new(R_EARTH_MEAN + 401_000.0, 0.0, 0.0), Vector3::zeros());
        let curr = make_state(60.0, Vector3::new(R_EARTH_MEAN + 399_000.0, 0.0, 0.0), Vector3::zeros());
        let ev = det.check(&prev, &curr).unwrap();
        assert!(matches!(ev.kind, EventKind::AltitudeCrossing { ascending: false, .. }));
        assert!((seconds_between(prev.epoch, ev.epoch) - 30.0).abs() < 1e-6);
        assert!(det.has_fired());
        assert!(det.check(&prev, &curr).is_none());
    }
}

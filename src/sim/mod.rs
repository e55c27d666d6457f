pub mod event;
pub mod integrator;
pub mod runner;

pub use event::{AltitudeDetector, ApsisDetector, EventDetector, EventKind, NodeDetector, OrbitEvent};
pub use integrator::IntegratorKind;
pub use runner::{propagate, propagate_named, propagate_with_events, Propagation, PropagationConfig};

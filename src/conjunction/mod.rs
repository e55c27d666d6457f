//! Conjunction screening: close-approach search over sampled trajectory
//! pairs, encounter-plane geometry and collision probability.

pub mod bplane;
pub mod covariance;
pub mod probability;
pub mod profiles;
pub mod screening;

pub use bplane::{b_plane, BPlane, BPlaneGeometry};
pub use covariance::PositionCovariance;
pub use probability::{
    assess_conjunction, collision_probability, maximum_probability, ConjunctionEvent, ProbabilityMethod,
};
pub use profiles::{
    evaluate_profiled_screening, get_screening_profile, ProbabilityBand, ProfiledScreening, ScreeningProfile,
};
pub use screening::{screen_pair, screen_pairs, CloseApproach, PairScreening, ScreeningConfig};

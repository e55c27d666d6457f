pub mod config;
pub mod conjunction;
pub mod constants;
pub mod epoch;
pub mod error;
pub mod forces;
pub mod frames;
pub mod lifetime;
pub mod observation;
pub mod orbital;
pub mod physics;
pub mod sim;
pub mod station_keeping;

pub use config::EngineConfig;
pub use error::{Error, Result};

// Flat re-exports of the main entry points
pub mod prelude {
    pub use crate::conjunction::{
        assess_conjunction, collision_probability, evaluate_profiled_screening, get_screening_profile,
        screen_pair, screen_pairs, PositionCovariance, ScreeningConfig,
    };
    pub use crate::forces::{ForceModel, ForceSet};
    pub use crate::lifetime::{compute_orbit_lifetime, LifetimeConfig};
    pub use crate::orbital::{generate_walker_shell, OrbitalElements, OrbitalState, ShellConfig};
    pub use crate::physics::DragConfig;
    pub use crate::sim::{propagate, propagate_named, PropagationConfig};
    pub use crate::station_keeping::{compute_station_keeping_budget, StationKeepingConfig};
    pub use crate::{EngineConfig, Error, Result};
}

pub mod constellation;
pub mod elements;
pub mod ground_track;
pub mod maneuvers;
pub mod propagator;

pub use constellation::{generate_sso_band_configs, generate_walker_shell, Satellite, ShellConfig};
pub use elements::{
    kepler_to_cartesian, mean_to_true_anomaly, sso_inclination, state_vector_to_elements,
    true_to_mean_anomaly, OrbitalElements,
};
pub use ground_track::{compute_ground_track, GroundTrackPoint};
pub use maneuvers::{circular_velocity, deorbit_delta_v, hohmann, HohmannTransfer};
pub use propagator::{propagate_circular, CircularOrbit, OrbitalState};

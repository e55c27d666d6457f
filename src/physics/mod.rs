pub mod atmosphere;
pub mod drag;
pub mod gravity;

pub use atmosphere::{atmospheric_density, density_or_vacuum};
pub use drag::{drag_acceleration, semi_major_axis_decay_rate, DragConfig};

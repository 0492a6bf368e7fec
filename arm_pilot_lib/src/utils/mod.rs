pub mod dh_kinematics;
pub mod tracing;

pub use dh_kinematics::{DhKinematics, KinematicsSolver};
pub use tracing::init_tracing;

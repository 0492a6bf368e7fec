pub mod actuator;
pub mod dispatcher;
pub mod interpolator;

pub use actuator::{
    drive_gripper_trajectory, drive_joint_trajectory, Actuator, NullActuator, Pacing,
    SimulatedActuator,
};
pub use dispatcher::ToolDispatcher;
pub use interpolator::{interpolate, interpolate_scalar, JointConfiguration};

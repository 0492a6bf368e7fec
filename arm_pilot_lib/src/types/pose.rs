use nalgebra::{UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// Cartesian target for the end effector.
///
/// Constructed fresh per command and never mutated afterwards. When a tool
/// call carries no orientation the gripper-down orientation is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    /// Downward-facing gripper orientation (roll 0, pitch pi, yaw 0).
    pub fn downward_orientation() -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(0.0, PI, 0.0)
    }

    /// Position target with the default downward gripper orientation.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            orientation: Self::downward_orientation(),
        }
    }

    /// Position target with an explicit roll/pitch/yaw orientation.
    pub fn with_orientation(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            orientation: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// Build a pose from the wire representation of a `move_arm` call.
    pub fn from_parts(position: [f64; 3], orientation: Option<[f64; 3]>) -> Self {
        match orientation {
            Some([roll, pitch, yaw]) => {
                Self::with_orientation(position[0], position[1], position[2], roll, pitch, yaw)
            }
            None => Self::new(position[0], position[1], position[2]),
        }
    }
}

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmConfig {
    pub name: String,
    pub dof: usize,
    pub joint_names: Vec<String>,
    pub home_configuration: Vec<f64>,
    pub joint_limits: Vec<JointLimit>,
    pub kinematics: KinematicsConfig,
    pub control: ControlConfig,
    pub gripper: GripperConfig,
    pub ik: IkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointLimit {
    pub min_angle: f64,
    pub max_angle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicsConfig {
    pub dh_parameters: Vec<DHParameter>,
    pub base_offset: [f64; 3], // x, y, z
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DHParameter {
    pub a: f64,     // link length
    pub alpha: f64, // link twist
    pub d: f64,     // link offset
    pub theta: f64, // joint angle offset
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Waypoints per arm trajectory. Tunable, not a behavioral contract.
    pub arm_steps: usize,
    /// Waypoints per gripper trajectory.
    pub gripper_steps: usize,
    pub position_tolerance: f64,
    pub orientation_tolerance: f64,
    /// Sleep every N ticks to keep the simulation watchable. 0 disables.
    #[serde(default)]
    pub pacing_every_ticks: u64,
    #[serde(default)]
    pub pacing_sleep_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GripperConfig {
    /// Fully open aperture in meters; closed is always 0.0.
    pub open_limit: f64,
    /// Sign applied to the second finger channel (+1 or -1 depending on
    /// the joint convention of the gripper model).
    pub mirror_sign: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IkConfig {
    pub max_iterations: usize,
    pub damping: f64,
    /// Weight of the orientation error relative to position. 0 solves
    /// position only.
    pub orientation_weight: f64,
}

impl ArmConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ArmConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.joint_limits.len() != self.dof {
            return Err(eyre::eyre!(
                "Joint limits count ({}) doesn't match DOF ({})",
                self.joint_limits.len(),
                self.dof
            ));
        }

        if self.kinematics.dh_parameters.len() != self.dof {
            return Err(eyre::eyre!(
                "DH parameters count ({}) doesn't match DOF ({})",
                self.kinematics.dh_parameters.len(),
                self.dof
            ));
        }

        if self.joint_names.len() != self.dof {
            return Err(eyre::eyre!(
                "Joint names count ({}) doesn't match DOF ({})",
                self.joint_names.len(),
                self.dof
            ));
        }

        if self.home_configuration.len() != self.dof {
            return Err(eyre::eyre!(
                "Home configuration count ({}) doesn't match DOF ({})",
                self.home_configuration.len(),
                self.dof
            ));
        }

        if self.gripper.open_limit <= 0.0 {
            return Err(eyre::eyre!(
                "Gripper open limit must be positive, got {}",
                self.gripper.open_limit
            ));
        }

        Ok(())
    }
}

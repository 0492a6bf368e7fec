//! Tool-call dispatch: name routing, argument validation, joint-limit
//! checks, and blocking trajectory execution.

use crate::control::actuator::{drive_gripper_trajectory, drive_joint_trajectory, Actuator};
use crate::control::interpolator::{interpolate, interpolate_scalar};
use crate::types::{ArmConfig, ControlError, JointTelemetry, MoveArmArgs, Pose, ToolResponse};
use crate::utils::KinematicsSolver;
use serde_json::Value;
use tracing::{debug, info};

/// Routes named tool calls to actuator operations.
///
/// Fully synchronous: `dispatch` blocks until the whole trajectory has
/// drained, so no two trajectories ever interleave on the same actuator.
/// The dispatcher exclusively owns the actuator state.
pub struct ToolDispatcher<A: Actuator, S: KinematicsSolver> {
    actuator: A,
    solver: S,
    config: ArmConfig,
}

impl<A: Actuator, S: KinematicsSolver> ToolDispatcher<A, S> {
    pub fn new(actuator: A, solver: S, config: ArmConfig) -> Self {
        Self {
            actuator,
            solver,
            config,
        }
    }

    /// Execute one tool call to completion.
    ///
    /// Errors propagate unmodified; there is no retry and no rollback. A
    /// fault mid-trajectory leaves the arm at the last applied waypoint,
    /// so callers should re-query state before issuing a corrective
    /// command.
    pub fn dispatch(&mut self, tool: &str, args: &Value) -> Result<ToolResponse, ControlError> {
        info!("dispatching tool call: {}", tool);

        let steps_executed = match tool {
            "move_arm" => self.move_arm(args)?,
            "open_gripper" => self.drive_gripper(self.config.gripper.open_limit)?,
            "close_gripper" => self.drive_gripper(0.0)?,
            "home" => self.move_to_joints("home", self.config.home_configuration.clone())?,
            other => return Err(ControlError::UnknownTool(other.to_string())),
        };

        Ok(ToolResponse {
            tool: tool.to_string(),
            steps_executed,
            joint_positions: self.actuator.joint_positions(),
            gripper_aperture: self.actuator.gripper_aperture(),
            timestamp: crate::types::now_millis(),
        })
    }

    /// Telemetry snapshot for the dataflow, taken between commands.
    pub fn telemetry(&self) -> JointTelemetry {
        JointTelemetry {
            names: self.config.joint_names.clone(),
            positions: self.actuator.joint_positions(),
            gripper_aperture: self.actuator.gripper_aperture(),
            ticks_elapsed: self.actuator.ticks(),
            timestamp: crate::types::now_millis(),
        }
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    fn move_arm(&mut self, args: &Value) -> Result<usize, ControlError> {
        let args: MoveArmArgs =
            serde_json::from_value(args.clone()).map_err(|e| ControlError::InvalidArgument {
                tool: "move_arm".to_string(),
                reason: e.to_string(),
            })?;

        let pose = Pose::from_parts(args.target, args.orientation);
        debug!(
            "resolving target ({:.3}, {:.3}, {:.3}) through IK",
            pose.position.x, pose.position.y, pose.position.z
        );

        let current = self.actuator.joint_positions();
        let target_joints = self.solver.solve(&current, &pose)?;
        self.move_to_joints("move_arm", target_joints)
    }

    fn move_to_joints(&mut self, tool: &str, target: Vec<f64>) -> Result<usize, ControlError> {
        self.check_joint_limits(tool, &target)?;

        let current = self.actuator.joint_positions();
        let segment = interpolate(&current, &target, self.config.control.arm_steps);
        drive_joint_trajectory(&mut self.actuator, &segment)?;
        Ok(segment.len())
    }

    fn drive_gripper(&mut self, target: f64) -> Result<usize, ControlError> {
        let current = self.actuator.gripper_aperture();
        let apertures = interpolate_scalar(current, target, self.config.control.gripper_steps);
        drive_gripper_trajectory(&mut self.actuator, &apertures)?;
        Ok(apertures.len())
    }

    fn check_joint_limits(&self, tool: &str, target: &[f64]) -> Result<(), ControlError> {
        if target.len() != self.config.dof {
            return Err(ControlError::InvalidArgument {
                tool: tool.to_string(),
                reason: format!(
                    "resolved {} joint angles for a {}-DOF arm",
                    target.len(),
                    self.config.dof
                ),
            });
        }

        for (i, &angle) in target.iter().enumerate() {
            let limits = &self.config.joint_limits[i];
            if angle < limits.min_angle || angle > limits.max_angle {
                return Err(ControlError::InvalidArgument {
                    tool: tool.to_string(),
                    reason: format!(
                        "joint {} angle {:.3} outside limits [{:.3}, {:.3}]",
                        i, angle, limits.min_angle, limits.max_angle
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::actuator::SimulatedActuator;
    use crate::types::{
        ControlConfig, DHParameter, GripperConfig, IkConfig, JointLimit, KinematicsConfig,
    };
    use crate::utils::DhKinematics;
    use serde_json::json;

    /// Planar two-link arm (links 0.25 m each) in the XY plane; IK solves
    /// position only.
    fn planar_config(limit: f64) -> ArmConfig {
        ArmConfig {
            name: "planar_2r".to_string(),
            dof: 2,
            joint_names: vec!["shoulder".to_string(), "elbow".to_string()],
            home_configuration: vec![0.1, 0.2],
            joint_limits: vec![
                JointLimit {
                    min_angle: -limit,
                    max_angle: limit,
                },
                JointLimit {
                    min_angle: -limit,
                    max_angle: limit,
                },
            ],
            kinematics: KinematicsConfig {
                dh_parameters: vec![
                    DHParameter {
                        a: 0.25,
                        alpha: 0.0,
                        d: 0.0,
                        theta: 0.0,
                    },
                    DHParameter {
                        a: 0.25,
                        alpha: 0.0,
                        d: 0.0,
                        theta: 0.0,
                    },
                ],
                base_offset: [0.0, 0.0, 0.0],
            },
            control: ControlConfig {
                arm_steps: 20,
                gripper_steps: 8,
                position_tolerance: 1e-4,
                orientation_tolerance: 0.05,
                pacing_every_ticks: 0,
                pacing_sleep_ms: 0,
            },
            gripper: GripperConfig {
                open_limit: 0.05,
                mirror_sign: 1.0,
            },
            ik: IkConfig {
                max_iterations: 500,
                damping: 0.05,
                orientation_weight: 0.0,
            },
        }
    }

    /// Records every applied waypoint while behaving like the simulated
    /// actuator.
    struct RecordingActuator {
        inner: SimulatedActuator,
        joint_history: Vec<Vec<f64>>,
        aperture_history: Vec<f64>,
    }

    impl RecordingActuator {
        fn new(config: &ArmConfig) -> Self {
            Self {
                inner: SimulatedActuator::new(
                    config.home_configuration.clone(),
                    config.gripper.open_limit,
                    config.gripper.mirror_sign,
                ),
                joint_history: Vec::new(),
                aperture_history: Vec::new(),
            }
        }
    }

    impl Actuator for RecordingActuator {
        fn dof(&self) -> usize {
            self.inner.dof()
        }
        fn joint_positions(&self) -> Vec<f64> {
            self.inner.joint_positions()
        }
        fn gripper_aperture(&self) -> f64 {
            self.inner.gripper_aperture()
        }
        fn ticks(&self) -> u64 {
            self.inner.ticks()
        }
        fn apply_joint_targets(&mut self, targets: &[f64]) -> Result<(), ControlError> {
            self.joint_history.push(targets.to_vec());
            self.inner.apply_joint_targets(targets)
        }
        fn apply_gripper_target(&mut self, aperture: f64) -> Result<(), ControlError> {
            self.aperture_history.push(aperture);
            self.inner.apply_gripper_target(aperture)
        }
        fn step(&mut self) -> Result<(), ControlError> {
            self.inner.step()
        }
    }

    fn dispatcher_with(
        config: ArmConfig,
    ) -> ToolDispatcher<RecordingActuator, DhKinematics> {
        let actuator = RecordingActuator::new(&config);
        let solver = DhKinematics::from_config(&config);
        ToolDispatcher::new(actuator, solver, config)
    }

    #[test]
    fn test_unknown_tool_leaves_state_unchanged() {
        let mut dispatcher = dispatcher_with(planar_config(std::f64::consts::PI));
        let before = dispatcher.actuator().joint_positions();

        let err = dispatcher.dispatch("unknown_tool", &json!({})).unwrap_err();
        assert!(matches!(err, ControlError::UnknownTool(_)));
        assert_eq!(dispatcher.actuator().joint_positions(), before);
        assert_eq!(dispatcher.actuator().ticks(), 0);
    }

    #[test]
    fn test_move_arm_requires_target() {
        let mut dispatcher = dispatcher_with(planar_config(std::f64::consts::PI));

        let err = dispatcher.dispatch("move_arm", &json!({})).unwrap_err();
        assert!(matches!(err, ControlError::InvalidArgument { .. }));
        assert_eq!(dispatcher.actuator().ticks(), 0);
    }

    #[test]
    fn test_move_arm_starts_at_prior_configuration() {
        let config = planar_config(std::f64::consts::PI);
        let home = config.home_configuration.clone();
        let steps = config.control.arm_steps;
        let mut dispatcher = dispatcher_with(config);

        let response = dispatcher
            .dispatch("move_arm", &json!({ "target": [0.3, 0.2, 0.0] }))
            .unwrap();
        assert_eq!(response.steps_executed, steps);

        let history = &dispatcher.actuator().joint_history;
        assert_eq!(history.len(), steps);
        assert_eq!(history[0], home);
    }

    #[test]
    fn test_move_arm_reaches_target_pose() {
        let config = planar_config(std::f64::consts::PI);
        let solver = DhKinematics::from_config(&config);
        let mut dispatcher = dispatcher_with(config);

        dispatcher
            .dispatch("move_arm", &json!({ "target": [0.3, 0.2, 0.0] }))
            .unwrap();

        let reached = solver.forward(&dispatcher.actuator().joint_positions());
        assert!((reached.translation.x - 0.3).abs() < 1e-3);
        assert!((reached.translation.y - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_repeated_move_arm_is_a_no_op_motion() {
        let config = planar_config(std::f64::consts::PI);
        let steps = config.control.arm_steps;
        let mut dispatcher = dispatcher_with(config);
        let args = json!({ "target": [0.3, 0.2, 0.0] });

        dispatcher.dispatch("move_arm", &args).unwrap();
        let settled = dispatcher.actuator().joint_positions();

        dispatcher.dispatch("move_arm", &args).unwrap();
        let history = &dispatcher.actuator().joint_history;
        assert_eq!(history.len(), 2 * steps);
        for waypoint in &history[steps..] {
            assert_eq!(*waypoint, settled);
        }
    }

    #[test]
    fn test_close_then_open_restores_aperture() {
        let mut dispatcher = dispatcher_with(planar_config(std::f64::consts::PI));
        let before = dispatcher.actuator().gripper_aperture();

        dispatcher.dispatch("close_gripper", &json!({})).unwrap();
        assert_eq!(dispatcher.actuator().gripper_aperture(), 0.0);

        dispatcher.dispatch("open_gripper", &json!({})).unwrap();
        assert_eq!(dispatcher.actuator().gripper_aperture(), before);
    }

    #[test]
    fn test_gripper_trajectory_length_uses_gripper_steps() {
        let config = planar_config(std::f64::consts::PI);
        let gripper_steps = config.control.gripper_steps;
        let mut dispatcher = dispatcher_with(config);

        let response = dispatcher.dispatch("close_gripper", &json!({})).unwrap();
        assert_eq!(response.steps_executed, gripper_steps);
        assert_eq!(dispatcher.actuator().aperture_history.len(), gripper_steps);
    }

    #[test]
    fn test_home_returns_to_home_configuration() {
        let config = planar_config(std::f64::consts::PI);
        let home = config.home_configuration.clone();
        let mut dispatcher = dispatcher_with(config);

        dispatcher
            .dispatch("move_arm", &json!({ "target": [0.3, 0.2, 0.0] }))
            .unwrap();
        dispatcher.dispatch("home", &json!({})).unwrap();
        assert_eq!(dispatcher.actuator().joint_positions(), home);
    }

    #[test]
    fn test_limit_violation_applies_nothing() {
        // Tight limits: a target behind the base needs |q1| well above 1.
        let mut dispatcher = dispatcher_with(planar_config(1.0));

        let err = dispatcher
            .dispatch("move_arm", &json!({ "target": [-0.3, 0.2, 0.0] }))
            .unwrap_err();
        assert!(matches!(err, ControlError::InvalidArgument { .. }));
        assert_eq!(dispatcher.actuator().ticks(), 0);
        assert!(dispatcher.actuator().joint_history.is_empty());
    }
}

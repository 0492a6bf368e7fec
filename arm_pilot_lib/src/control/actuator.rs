//! Actuator seam between the control core and whatever executes joint
//! targets: an in-process simulation, a render bridge, or real hardware.

use crate::control::interpolator::JointConfiguration;
use crate::types::ControlError;
use std::time::Duration;
use tracing::debug;

/// Position-controlled actuator with a tick-based clock.
///
/// The control loop assumes the underlying position controller converges
/// within one tick's interpolation error; no achieved-position feedback is
/// read back. One trajectory at a time: callers drain a full segment
/// before issuing the next (the dispatcher is synchronous by design).
pub trait Actuator {
    fn dof(&self) -> usize;

    fn joint_positions(&self) -> Vec<f64>;

    fn gripper_aperture(&self) -> f64;

    /// Ticks elapsed since the actuator was created.
    fn ticks(&self) -> u64;

    /// Issue position-control targets for every arm joint for this tick.
    fn apply_joint_targets(&mut self, targets: &[f64]) -> Result<(), ControlError>;

    /// Issue an aperture target, mirrored onto both finger channels.
    fn apply_gripper_target(&mut self, aperture: f64) -> Result<(), ControlError>;

    /// Advance the simulation/control clock by one tick.
    fn step(&mut self) -> Result<(), ControlError>;
}

/// Real-time pacing: sleep `sleep` once every `every_ticks` ticks so a
/// human can follow the motion. Rate limiting only, not a correctness
/// requirement.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub every_ticks: u64,
    pub sleep: Duration,
}

/// In-process actuator whose position controller converges instantly:
/// targets applied before a tick become positions when the tick elapses.
pub struct SimulatedActuator {
    positions: Vec<f64>,
    pending_targets: Option<Vec<f64>>,
    finger_positions: [f64; 2],
    pending_aperture: Option<f64>,
    mirror_sign: f64,
    tick: u64,
    pacing: Option<Pacing>,
}

impl SimulatedActuator {
    pub fn new(home: Vec<f64>, initial_aperture: f64, mirror_sign: f64) -> Self {
        Self {
            positions: home,
            pending_targets: None,
            finger_positions: [mirror_sign * initial_aperture, initial_aperture],
            pending_aperture: None,
            mirror_sign,
            tick: 0,
            pacing: None,
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Both finger channel positions, second channel carrying the
    /// mirror sign.
    pub fn finger_positions(&self) -> [f64; 2] {
        self.finger_positions
    }
}

impl Actuator for SimulatedActuator {
    fn dof(&self) -> usize {
        self.positions.len()
    }

    fn joint_positions(&self) -> Vec<f64> {
        self.positions.clone()
    }

    fn gripper_aperture(&self) -> f64 {
        self.finger_positions[1]
    }

    fn ticks(&self) -> u64 {
        self.tick
    }

    fn apply_joint_targets(&mut self, targets: &[f64]) -> Result<(), ControlError> {
        if targets.len() != self.positions.len() {
            return Err(ControlError::ActuatorFault(format!(
                "target vector has {} entries for a {}-joint arm",
                targets.len(),
                self.positions.len()
            )));
        }
        self.pending_targets = Some(targets.to_vec());
        Ok(())
    }

    fn apply_gripper_target(&mut self, aperture: f64) -> Result<(), ControlError> {
        self.pending_aperture = Some(aperture);
        Ok(())
    }

    fn step(&mut self) -> Result<(), ControlError> {
        if let Some(targets) = self.pending_targets.take() {
            self.positions = targets;
        }
        if let Some(aperture) = self.pending_aperture.take() {
            self.finger_positions = [self.mirror_sign * aperture, aperture];
        }
        self.tick += 1;

        if let Some(pacing) = self.pacing {
            if pacing.every_ticks > 0 && self.tick % pacing.every_ticks == 0 {
                std::thread::sleep(pacing.sleep);
            }
        }
        Ok(())
    }
}

/// Actuator that accepts and discards everything. For tests and dry runs.
pub struct NullActuator {
    dof: usize,
    tick: u64,
}

impl NullActuator {
    pub fn new(dof: usize) -> Self {
        Self { dof, tick: 0 }
    }
}

impl Actuator for NullActuator {
    fn dof(&self) -> usize {
        self.dof
    }

    fn joint_positions(&self) -> Vec<f64> {
        vec![0.0; self.dof]
    }

    fn gripper_aperture(&self) -> f64 {
        0.0
    }

    fn ticks(&self) -> u64 {
        self.tick
    }

    fn apply_joint_targets(&mut self, _targets: &[f64]) -> Result<(), ControlError> {
        Ok(())
    }

    fn apply_gripper_target(&mut self, _aperture: f64) -> Result<(), ControlError> {
        Ok(())
    }

    fn step(&mut self) -> Result<(), ControlError> {
        self.tick += 1;
        Ok(())
    }
}

/// Apply an arm trajectory one waypoint per tick, blocking until it drains.
pub fn drive_joint_trajectory(
    actuator: &mut dyn Actuator,
    segment: &[JointConfiguration],
) -> Result<(), ControlError> {
    debug!("driving arm trajectory: {} waypoints", segment.len());
    for waypoint in segment {
        actuator.apply_joint_targets(waypoint)?;
        actuator.step()?;
    }
    Ok(())
}

/// Gripper counterpart of [`drive_joint_trajectory`].
pub fn drive_gripper_trajectory(
    actuator: &mut dyn Actuator,
    apertures: &[f64],
) -> Result<(), ControlError> {
    debug!("driving gripper trajectory: {} waypoints", apertures.len());
    for &aperture in apertures {
        actuator.apply_gripper_target(aperture)?;
        actuator.step()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::interpolator::interpolate;

    #[test]
    fn test_targets_become_positions_after_step() {
        let mut actuator = SimulatedActuator::new(vec![0.0, 0.0], 0.05, 1.0);
        actuator.apply_joint_targets(&[0.5, -0.5]).unwrap();
        assert_eq!(actuator.joint_positions(), vec![0.0, 0.0]);

        actuator.step().unwrap();
        assert_eq!(actuator.joint_positions(), vec![0.5, -0.5]);
        assert_eq!(actuator.ticks(), 1);
    }

    #[test]
    fn test_gripper_mirrors_with_sign() {
        let mut actuator = SimulatedActuator::new(vec![0.0], 0.0, -1.0);
        actuator.apply_gripper_target(0.04).unwrap();
        actuator.step().unwrap();

        assert_eq!(actuator.gripper_aperture(), 0.04);
        assert_eq!(actuator.finger_positions(), [-0.04, 0.04]);
    }

    #[test]
    fn test_dof_mismatch_is_a_fault() {
        let mut actuator = SimulatedActuator::new(vec![0.0; 7], 0.05, 1.0);
        let err = actuator.apply_joint_targets(&[0.0; 3]).unwrap_err();
        assert!(matches!(err, ControlError::ActuatorFault(_)));
    }

    #[test]
    fn test_drive_consumes_one_waypoint_per_tick() {
        let mut actuator = SimulatedActuator::new(vec![0.0, 0.0], 0.05, 1.0);
        let segment = interpolate(&[0.0, 0.0], &[1.0, 2.0], 25);

        drive_joint_trajectory(&mut actuator, &segment).unwrap();
        assert_eq!(actuator.ticks(), 25);
        assert_eq!(actuator.joint_positions(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_null_actuator_only_counts_ticks() {
        let mut actuator = NullActuator::new(7);
        actuator.apply_joint_targets(&[1.0; 7]).unwrap();
        actuator.step().unwrap();

        assert_eq!(actuator.joint_positions(), vec![0.0; 7]);
        assert_eq!(actuator.ticks(), 1);
    }
}

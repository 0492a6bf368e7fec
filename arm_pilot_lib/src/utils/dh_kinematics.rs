//! Denavit-Hartenberg chain kinematics.
//!
//! Forward kinematics composes the classic DH transform per joint:
//!
//! T_i = RotZ(theta_i + offset_i) * TransZ(d_i) * TransX(a_i) * RotX(alpha_i)
//!
//! Inverse kinematics runs damped least squares over a numerical Jacobian:
//!
//! dq = J^T (J J^T + lambda^2 I)^-1 e
//!
//! where e stacks the position error and the weighted orientation error
//! (as a scaled rotation axis). The solver is limit-unaware; the
//! dispatcher checks joint limits on the result.

use crate::types::{ArmConfig, ControlError, DHParameter, IkConfig, KinematicsConfig, Pose};
use nalgebra::{DMatrix, DVector, Isometry3, Vector3};

/// Largest per-iteration joint update (rad), keeps the iteration from
/// jumping across the workspace when the Jacobian is near-singular.
const MAX_STEP_NORM: f64 = 0.5;

/// Task-space error dimension: 3 position + 3 orientation components.
const TASK_DIM: usize = 6;

/// Resolves a Cartesian pose into a joint configuration.
///
/// Solvers may fail to converge; that is an unrecoverable error for the
/// current command and is propagated unmasked.
pub trait KinematicsSolver {
    fn solve(&self, current: &[f64], target: &Pose) -> Result<Vec<f64>, ControlError>;
}

/// DH-chain forward kinematics plus damped-least-squares IK.
pub struct DhKinematics {
    chain: KinematicsConfig,
    ik: IkConfig,
    position_tolerance: f64,
    orientation_tolerance: f64,
}

impl DhKinematics {
    pub fn new(
        chain: KinematicsConfig,
        ik: IkConfig,
        position_tolerance: f64,
        orientation_tolerance: f64,
    ) -> Self {
        Self {
            chain,
            ik,
            position_tolerance,
            orientation_tolerance,
        }
    }

    pub fn from_config(config: &ArmConfig) -> Self {
        Self::new(
            config.kinematics.clone(),
            config.ik.clone(),
            config.control.position_tolerance,
            config.control.orientation_tolerance,
        )
    }

    /// End-effector pose for a joint configuration.
    pub fn forward(&self, joints: &[f64]) -> Isometry3<f64> {
        let [bx, by, bz] = self.chain.base_offset;
        let mut pose = Isometry3::translation(bx, by, bz);
        for (dh, &angle) in self.chain.dh_parameters.iter().zip(joints) {
            pose *= dh_transform(dh, angle);
        }
        pose
    }

    /// Stacked task error [position; weighted orientation] at `joints`.
    fn task_error(&self, joints: &[f64], target: &Pose) -> DVector<f64> {
        let reached = self.forward(joints);

        let position_error = target.position - reached.translation.vector;
        let orientation_error =
            (target.orientation * reached.rotation.inverse()).scaled_axis();

        let mut error = DVector::zeros(TASK_DIM);
        error.fixed_rows_mut::<3>(0).copy_from(&position_error);
        error
            .fixed_rows_mut::<3>(3)
            .copy_from(&(orientation_error * self.ik.orientation_weight));
        error
    }

    fn converged(&self, joints: &[f64], target: &Pose) -> bool {
        let reached = self.forward(joints);
        let position_ok =
            (target.position - reached.translation.vector).norm() <= self.position_tolerance;
        let orientation_ok = self.ik.orientation_weight == 0.0
            || target.orientation.angle_to(&reached.rotation) <= self.orientation_tolerance;
        position_ok && orientation_ok
    }

    /// Forward-difference Jacobian of the task map at `joints`.
    fn numerical_jacobian(&self, joints: &[f64], target: &Pose) -> DMatrix<f64> {
        const EPS: f64 = 1e-6;
        let n = joints.len();
        let base_error = self.task_error(joints, target);

        let mut jacobian = DMatrix::zeros(TASK_DIM, n);
        let mut perturbed = joints.to_vec();
        for j in 0..n {
            perturbed[j] += EPS;
            let perturbed_error = self.task_error(&perturbed, target);
            perturbed[j] = joints[j];

            // The error shrinks as the task value grows, hence the flip.
            let column = (&base_error - &perturbed_error) / EPS;
            jacobian.set_column(j, &column);
        }
        jacobian
    }
}

impl KinematicsSolver for DhKinematics {
    fn solve(&self, current: &[f64], target: &Pose) -> Result<Vec<f64>, ControlError> {
        let n = self.chain.dh_parameters.len();
        if current.len() != n {
            return Err(ControlError::KinematicsFailure(format!(
                "seed has {} joints, chain has {}",
                current.len(),
                n
            )));
        }

        let lambda_sq = self.ik.damping * self.ik.damping;
        let mut joints = current.to_vec();

        for _ in 0..self.ik.max_iterations {
            if self.converged(&joints, target) {
                return Ok(joints);
            }

            let error = self.task_error(&joints, target);
            let jacobian = self.numerical_jacobian(&joints, target);

            let jjt = &jacobian * jacobian.transpose()
                + DMatrix::identity(TASK_DIM, TASK_DIM) * lambda_sq;
            let correction = jjt.lu().solve(&error).ok_or_else(|| {
                ControlError::KinematicsFailure("damped normal equations are singular".to_string())
            })?;
            let mut dq = jacobian.transpose() * correction;

            let norm = dq.norm();
            if norm > MAX_STEP_NORM {
                dq *= MAX_STEP_NORM / norm;
            }
            for (joint, delta) in joints.iter_mut().zip(dq.iter()) {
                *joint += delta;
            }
        }

        Err(ControlError::KinematicsFailure(format!(
            "no convergence after {} iterations for target ({:.3}, {:.3}, {:.3})",
            self.ik.max_iterations, target.position.x, target.position.y, target.position.z
        )))
    }
}

fn dh_transform(dh: &DHParameter, joint_angle: f64) -> Isometry3<f64> {
    let rot_z = Isometry3::rotation(Vector3::z() * (joint_angle + dh.theta));
    let trans_z = Isometry3::translation(0.0, 0.0, dh.d);
    let trans_x = Isometry3::translation(dh.a, 0.0, 0.0);
    let rot_x = Isometry3::rotation(Vector3::x() * dh.alpha);
    rot_z * trans_z * trans_x * rot_x
}

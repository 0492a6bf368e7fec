use thiserror::Error;

/// Failure modes of the control core.
///
/// None of these are retried or recovered locally; every error surfaces to
/// the caller of `dispatch`. A fault raised mid-trajectory leaves the
/// actuator at the last successfully applied waypoint.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The tool name is not registered with the dispatcher.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Required fields are missing or malformed, or a resolved joint
    /// target violates configured limits.
    #[error("invalid argument for {tool}: {reason}")]
    InvalidArgument { tool: String, reason: String },

    /// The inverse kinematics collaborator could not reach the target.
    #[error("inverse kinematics failed: {0}")]
    KinematicsFailure(String),

    /// The actuator backend rejected a control command.
    #[error("actuator fault: {0}")]
    ActuatorFault(String),
}

use serde::{Deserialize, Serialize};

/// Telemetry emitted after every completed tool call.
///
/// The sim bridge forwards `names`/`positions` verbatim to urdf-viz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointTelemetry {
    pub names: Vec<String>,
    pub positions: Vec<f64>,
    pub gripper_aperture: f64,
    pub ticks_elapsed: u64,
    pub timestamp: u64,
}

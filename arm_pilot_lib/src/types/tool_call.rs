use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire shape of one tool call: `{"tool": "move_arm", "args": {...}}`.
///
/// Carries no retry metadata. Each call is consumed at most once by the
/// dispatcher and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallWithMetadata {
    pub call: ToolCall,
    pub metadata: CommandMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub command_id: String,
    pub timestamp: u64,
    pub source: CallSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CallSource {
    Planner,
    Manual,
    Voice,
}

impl CommandMetadata {
    pub fn new(source: CallSource) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            timestamp: crate::types::now_millis(),
            source,
        }
    }
}

/// Arguments accepted by `move_arm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveArmArgs {
    /// Cartesian target position [x, y, z] in meters.
    pub target: [f64; 3],
    /// Optional roll/pitch/yaw in radians; gripper-down when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<[f64; 3]>,
}

/// Result returned to the transport once a trajectory has fully drained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub tool: String,
    pub steps_executed: usize,
    pub joint_positions: Vec<f64>,
    pub gripper_aperture: f64,
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_wire_shape() {
        let json = r#"{"tool": "move_arm", "args": {"target": [0.85, -0.2, 1.2]}}"#;
        let call: ToolCall = serde_json::from_str(json).unwrap();
        assert_eq!(call.tool, "move_arm");

        let args: MoveArmArgs = serde_json::from_value(call.args).unwrap();
        assert_eq!(args.target, [0.85, -0.2, 1.2]);
        assert!(args.orientation.is_none());
    }

    #[test]
    fn test_args_default_to_null() {
        let call: ToolCall = serde_json::from_str(r#"{"tool": "open_gripper"}"#).unwrap();
        assert!(call.args.is_null());
    }

    #[test]
    fn test_metadata_ids_are_unique() {
        let a = CommandMetadata::new(CallSource::Planner);
        let b = CommandMetadata::new(CallSource::Planner);
        assert_ne!(a.command_id, b.command_id);
    }
}

pub mod config;
pub mod errors;
pub mod pose;
pub mod telemetry;
pub mod tool_call;

pub use config::*;
pub use errors::*;
pub use pose::*;
pub use telemetry::*;
pub use tool_call::*;

/// Milliseconds since the unix epoch, for wire timestamps.
pub(crate) fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

//! # Arm Pilot Library
//!
//! Shared types and control core for the arm-pilot workcell: tool-call
//! dispatch, joint-space trajectory interpolation, the actuator seam, and
//! DH-chain kinematics. Used by all nodes in the dora-rs dataflow.

pub mod control;
pub mod types;
pub mod utils;

// Re-export everything for convenience
pub use control::*;
pub use types::*;
pub use utils::*;

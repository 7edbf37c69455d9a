//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface. Telecommands are issued by an operator (a script or a person at
//! the command line) and are executed by the arm executable.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod arm_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use thiserror::Error;

// Re-exports
pub use arm_ctrl::ArmCmd;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse an arm telecommand from a JSON string.
pub fn from_json(json_str: &str) -> Result<ArmCmd, TcParseError> {
    serde_json::from_str(json_str.trim()).map_err(TcParseError::InvalidJson)
}

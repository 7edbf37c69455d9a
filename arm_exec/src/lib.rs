//! # Arm library.
//!
//! This library allows other crates in the workspace to access items defined inside the arm
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control client - owns the link to the arm firmware and the joint state table
pub mod arm_client;

/// Parameters of the arm executable
pub mod params;

/// Telecommand processor - executes operator telecommands on an arm client
pub mod tc_processor;

//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the arm software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Operator telecommands
pub mod tc;

/// Command and response definitions for equipment (like the arm firmware)
pub mod eqpt;

/// Network module
pub mod net;

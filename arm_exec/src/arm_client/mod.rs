//! Arm control client module
//!
//! The client owns one [`Transport`](comms_if::net::Transport) to the arm firmware and the table
//! of joint states. Every public operation runs to completion before returning, commands are
//! issued and retired strictly one at a time in call order.
//!
//! A client must only be driven by a single caller. Sharing one instance between concurrent
//! callers is undefined behaviour as far as the joint state table is concerned.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod client;
mod joint_table;
mod motion;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::{eqpt::arm::ReplyError, net::TransportError};

// Internal
pub use client::*;
pub use joint_table::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ArmClient operation.
///
/// Everything up to and including `InvalidArgument` is detected before any network I/O and
/// leaves the client untouched.
#[derive(Debug, thiserror::Error)]
pub enum ArmClientError {
    #[error("The client is not connected to the arm")]
    NotConnected,

    #[error("Joint {joint} does not exist, the arm has {num_joints} joints")]
    InvalidJointIndex { joint: usize, num_joints: usize },

    #[error("Invalid joint limits: min ({min}) must be less than max ({max})")]
    InvalidLimitConfiguration { min: f64, max: f64 },

    #[error("Angle {angle:.2} is outside the limits of joint {joint} [{min:.2}, {max:.2}]")]
    LimitViolation {
        joint: usize,
        angle: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("The arm did not reply within the timeout")]
    ProtocolTimeout,

    #[error("The arm sent an unexpected reply: {0}")]
    ProtocolMismatch(String),

    #[error("Transport error: {0}")]
    Transport(TransportError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl From<TransportError> for ArmClientError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => ArmClientError::ProtocolTimeout,
            TransportError::NonUtf8Reply => ArmClientError::ProtocolMismatch(e.to_string()),
            e => ArmClientError::Transport(e),
        }
    }
}

impl From<ReplyError> for ArmClientError {
    fn from(e: ReplyError) -> Self {
        ArmClientError::ProtocolMismatch(e.to_string())
    }
}

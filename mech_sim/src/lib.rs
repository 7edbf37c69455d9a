//! # Mechanisms Simulator
//!
//! Software stand-in for the arm firmware. It speaks the same datagram protocol as the real arm so
//! the arm executable can be exercised without hardware.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Parameters for the simulator.
pub mod params;

/// Simulated joint state and command handling.
pub mod sim_arm;

/// UDP server exposing a simulated arm.
pub mod sim_server;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use params::SimParams;
pub use sim_arm::SimArm;
pub use sim_server::{SimHandle, SimServer, SimServerError};

//! Parameters structure for the arm executable

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::net::NetParams;
use serde::{Deserialize, Serialize};

use crate::arm_client::{DEFAULT_MAX_DEG, DEFAULT_MIN_DEG};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the arm executable, loaded from `arm_exec.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmExecParams {
    /// How to reach the arm firmware
    #[serde(default)]
    pub net: NetParams,

    /// Number of joints on the arm
    #[serde(default = "default_num_joints")]
    pub num_joints: usize,

    /// Number of times the executable tries to connect before giving up
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    #[serde(default)]
    pub motion: MotionParams,

    /// Per-joint configuration, in joint index order. Joints not listed keep the default limit
    /// and a zero offset.
    #[serde(default)]
    pub joints: Vec<JointParams>,
}

/// Defaults used by motion commands which do not give their own value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Units: degrees/second
    pub speed: f64,

    /// Size of a single step of a stepwise move.
    ///
    /// Units: degrees
    pub step_deg: f64,

    /// Pause between two steps of a stepwise move.
    ///
    /// Units: seconds
    pub step_delay_s: f64,

    /// Pause between two points of a trajectory.
    ///
    /// Units: seconds
    pub trajectory_pause_s: f64,

    /// Angle an axis command at rest (value 0) maps to.
    ///
    /// Units: degrees
    pub axis_centre_deg: f64,

    /// Angle offset from the centre an axis command at full deflection maps to.
    ///
    /// Units: degrees
    pub axis_gain_deg: f64,
}

/// Configuration of a single joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointParams {
    /// Units: degrees
    pub min_deg: f64,

    /// Units: degrees
    pub max_deg: f64,

    /// Units: degrees
    pub offset_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ArmExecParams {
    fn default() -> Self {
        Self {
            net: NetParams::default(),
            num_joints: default_num_joints(),
            connect_attempts: default_connect_attempts(),
            motion: MotionParams::default(),
            joints: vec![],
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            speed: 50.0,
            step_deg: 1.0,
            step_delay_s: 0.001,
            trajectory_pause_s: 0.5,
            axis_centre_deg: 90.0,
            axis_gain_deg: 45.0,
        }
    }
}

impl Default for JointParams {
    fn default() -> Self {
        Self {
            min_deg: DEFAULT_MIN_DEG,
            max_deg: DEFAULT_MAX_DEG,
            offset_deg: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn default_num_joints() -> usize {
    7
}

fn default_connect_attempts() -> u32 {
    3
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

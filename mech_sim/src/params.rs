//! # Mechanisms Simulator Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Address the server binds to, e.g. `0.0.0.0:4210`
    pub bind_address: String,

    /// Number of joints on the simulated arm
    pub num_joints: usize,

    /// Largest angle a joint can reach, angles are clamped to `[0, max_angle_deg]`.
    ///
    /// Units: degrees
    pub max_angle_deg: f64,

    /// Silently drop every Nth request to imitate packet loss. Zero never drops.
    pub drop_every: u32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            bind_address: String::from("0.0.0.0:4210"),
            num_joints: 7,
            max_angle_deg: 180.0,
            drop_every: 0,
        }
    }
}

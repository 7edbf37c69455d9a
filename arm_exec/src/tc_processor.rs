//! # Telecommand processor
//!
//! Executes operator telecommands on an [`ArmClient`]. Both the scripted executable and the
//! interactive command line go through [`exec`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use std::fmt;

use comms_if::{net::Transport, tc::ArmCmd};
use util::maths;

use crate::arm_client::{ArmClient, ArmClientError};
use crate::params::ArmExecParams;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Data produced by a telecommand.
#[derive(Debug, Clone, PartialEq)]
pub enum TcOutput {
    None,

    JointAngle { joint: usize, angle_deg: f64 },

    JointAngles(Vec<f64>),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl fmt::Display for TcOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcOutput::None => Ok(()),
            TcOutput::JointAngle { joint, angle_deg } => {
                write!(f, "joint {}: {:.2} deg", joint, angle_deg)
            }
            TcOutput::JointAngles(angles) => {
                let strs: Vec<String> = angles.iter().map(|a| format!("{:.2}", a)).collect();
                write!(f, "joints: [{}] deg", strs.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Connect the client and apply the configured joint parameters.
///
/// Limits and offsets live only in the client so they are applied on every new connection. An
/// already connected client is left as it is, keeping any limits or offsets set since.
pub fn connect<T: Transport>(
    client: &mut ArmClient<T>,
    params: &ArmExecParams,
) -> Result<(), ArmClientError> {
    if client.is_connected() {
        debug!("Already connected, keeping the current joint configuration");
        return Ok(());
    }

    client.connect()?;
    client.configure_joints(&params.joints)
}

/// Execute a single telecommand.
///
/// Any speed, step or delay the telecommand leaves out is taken from `params.motion`.
pub fn exec<T: Transport>(
    client: &mut ArmClient<T>,
    cmd: &ArmCmd,
    params: &ArmExecParams,
) -> Result<TcOutput, ArmClientError> {
    let motion = &params.motion;

    debug!("Executing TC: {:?}", cmd);

    match cmd {
        ArmCmd::Connect => connect(client, params)?,
        ArmCmd::Disconnect => client.disconnect(),
        ArmCmd::Home => client.move_to_home()?,
        ArmCmd::Get { joint: Some(joint) } => {
            return Ok(TcOutput::JointAngle {
                joint: *joint,
                angle_deg: client.get_joint_angle(*joint)?,
            })
        }
        ArmCmd::Get { joint: None } => {
            return Ok(TcOutput::JointAngles(client.get_all_joint_angles()))
        }
        ArmCmd::Limits {
            joint,
            min_deg,
            max_deg,
        } => client.set_joint_limits(*joint, *min_deg, *max_deg)?,
        ArmCmd::Offset { joint, offset_deg } => client.set_joint_offset(*joint, *offset_deg)?,
        ArmCmd::Joint {
            joint,
            angle_deg,
            speed,
            step_deg,
            delay_s,
        } => client.set_stepwise(
            *joint,
            *angle_deg,
            speed.unwrap_or(motion.speed),
            step_deg.unwrap_or(motion.step_deg),
            delay_s.unwrap_or(motion.step_delay_s),
        )?,
        ArmCmd::JointUnsafe {
            joint,
            angle_deg,
            speed,
        } => client.set_unsafe(*joint, *angle_deg, speed.unwrap_or(motion.speed))?,
        ArmCmd::All { angles_deg, speed } => {
            client.set_all(angles_deg, speed.unwrap_or(motion.speed))?
        }
        ArmCmd::Traj { points, speed } => {
            info!("Executing trajectory of {} point(s)", points.len());
            client.execute_trajectory(points, speed.unwrap_or(motion.speed))?
        }
        ArmCmd::Axis { joint, value } => {
            let angle_deg = axis_to_angle(*value, params)?;
            client.set_stepwise(
                *joint,
                angle_deg,
                motion.speed,
                motion.step_deg,
                motion.step_delay_s,
            )?
        }
    }

    Ok(TcOutput::None)
}

/// Map an axis value in [-1, 1] onto a joint angle around the configured centre. Values outside
/// the range are clamped.
pub fn axis_to_angle(value: f64, params: &ArmExecParams) -> Result<f64, ArmClientError> {
    if !value.is_finite() {
        return Err(ArmClientError::InvalidArgument(format!(
            "axis value must be finite, found {}",
            value
        )));
    }

    let centre = params.motion.axis_centre_deg;
    let gain = params.motion.axis_gain_deg;

    Ok(maths::lin_map(
        (-1.0, 1.0),
        (centre - gain, centre + gain),
        maths::clamp(value, -1.0, 1.0),
    ))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_axis_to_angle() {
        let params = ArmExecParams::default();

        assert_eq!(axis_to_angle(0.0, &params).unwrap(), 90.0);
        assert_eq!(axis_to_angle(1.0, &params).unwrap(), 135.0);
        assert_eq!(axis_to_angle(-0.5, &params).unwrap(), 67.5);
        assert_eq!(axis_to_angle(-3.0, &params).unwrap(), 45.0);
        assert!(axis_to_angle(std::f64::NAN, &params).is_err());
    }

    #[test]
    fn test_output_display() {
        assert_eq!(TcOutput::None.to_string(), "");
        assert_eq!(
            TcOutput::JointAngle {
                joint: 2,
                angle_deg: 12.346
            }
            .to_string(),
            "joint 2: 12.35 deg"
        );
        assert_eq!(
            TcOutput::JointAngles(vec![0.0, 1.5]).to_string(),
            "joints: [0.00, 1.50] deg"
        );
    }
}

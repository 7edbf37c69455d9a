//! # Arm control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::{clap::AppSettings, StructOpt};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be completed by arm control.
///
/// Angles are in degrees and are the operator's angles, i.e. before the joint's calibration
/// offset is applied. Any speed, step or delay left out is filled from the configured motion
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
#[serde(rename_all = "snake_case")]
#[structopt(name = "arm", no_version)]
pub enum ArmCmd {
    /// Perform the connection handshake with the arm.
    #[structopt(name = "connect")]
    Connect,

    /// Disconnect from the arm.
    #[structopt(name = "disconnect")]
    Disconnect,

    /// Move all joints to zero.
    #[structopt(name = "home")]
    Home,

    /// Read back one joint angle, or all of them if no joint is given.
    #[structopt(name = "get")]
    Get { joint: Option<usize> },

    /// Configure the inclusive angle limits of a joint.
    #[structopt(name = "limits", setting = AppSettings::AllowNegativeNumbers)]
    Limits {
        joint: usize,
        min_deg: f64,
        max_deg: f64,
    },

    /// Configure the calibration offset of a joint.
    #[structopt(name = "offset", setting = AppSettings::AllowNegativeNumbers)]
    Offset { joint: usize, offset_deg: f64 },

    /// Move a single joint in small steps, all of which stay within its limits.
    #[structopt(name = "joint", setting = AppSettings::AllowNegativeNumbers)]
    Joint {
        joint: usize,

        angle_deg: f64,

        #[structopt(long)]
        #[serde(default)]
        speed: Option<f64>,

        #[structopt(long = "step")]
        #[serde(default)]
        step_deg: Option<f64>,

        #[structopt(long = "delay")]
        #[serde(default)]
        delay_s: Option<f64>,
    },

    /// Move a single joint in one command, requiring an acknowledgement.
    #[structopt(name = "unsafe", setting = AppSettings::AllowNegativeNumbers)]
    JointUnsafe {
        joint: usize,

        angle_deg: f64,

        #[structopt(long)]
        #[serde(default)]
        speed: Option<f64>,
    },

    /// Move every joint at once.
    #[structopt(name = "all", setting = AppSettings::AllowNegativeNumbers)]
    All {
        #[structopt(required = true)]
        angles_deg: Vec<f64>,

        #[structopt(long)]
        #[serde(default)]
        speed: Option<f64>,
    },

    /// Visit a sequence of all-joint targets in order.
    ///
    /// The points can only be given in scripts.
    #[structopt(name = "traj")]
    Traj {
        #[structopt(skip)]
        points: Vec<Vec<f64>>,

        #[structopt(long)]
        #[serde(default)]
        speed: Option<f64>,
    },

    /// Drive a joint from a gamepad style axis value in the range [-1, 1].
    #[structopt(name = "axis", setting = AppSettings::AllowNegativeNumbers)]
    Axis { joint: usize, value: f64 },
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn parse(line: &str) -> Result<ArmCmd, structopt::clap::Error> {
        ArmCmd::from_iter_safe(std::iter::once("arm").chain(line.split_whitespace()))
    }

    #[test]
    fn test_parse_cli() {
        assert_eq!(parse("home").unwrap(), ArmCmd::Home);
        assert_eq!(parse("get").unwrap(), ArmCmd::Get { joint: None });
        assert_eq!(parse("get 3").unwrap(), ArmCmd::Get { joint: Some(3) });
        assert_eq!(
            parse("limits 6 -10 90").unwrap(),
            ArmCmd::Limits {
                joint: 6,
                min_deg: -10.0,
                max_deg: 90.0
            }
        );
        assert_eq!(
            parse("joint 1 45 --step 0.5").unwrap(),
            ArmCmd::Joint {
                joint: 1,
                angle_deg: 45.0,
                speed: None,
                step_deg: Some(0.5),
                delay_s: None
            }
        );
        assert_eq!(
            parse("all 0 10 -20 --speed 30").unwrap(),
            ArmCmd::All {
                angles_deg: vec![0.0, 10.0, -20.0],
                speed: Some(30.0)
            }
        );
        assert_eq!(
            parse("axis 0 -0.5").unwrap(),
            ArmCmd::Axis {
                joint: 0,
                value: -0.5
            }
        );

        assert!(parse("all").is_err());
        assert!(parse("fly 1").is_err());
    }

    #[test]
    fn test_parse_json() {
        let cmd: ArmCmd =
            serde_json::from_str(r#"{"joint": {"joint": 2, "angle_deg": 90.0}}"#).unwrap();
        assert_eq!(
            cmd,
            ArmCmd::Joint {
                joint: 2,
                angle_deg: 90.0,
                speed: None,
                step_deg: None,
                delay_s: None
            }
        );

        let cmd: ArmCmd = serde_json::from_str(
            r#"{"traj": {"points": [[0.0, 0.0], [10.0, 20.0]], "speed": 20.0}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            ArmCmd::Traj {
                points: vec![vec![0.0, 0.0], vec![10.0, 20.0]],
                speed: Some(20.0)
            }
        );

        let cmd: ArmCmd = serde_json::from_str(r#""home""#).unwrap();
        assert_eq!(cmd, ArmCmd::Home);
    }
}

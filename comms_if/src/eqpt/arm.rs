//! # Arm Equipment Commands
//!
//! Text protocol spoken between the arm client and the arm firmware. Every command and every reply
//! is a single ASCII datagram. Commands are newline terminated, numeric fields are always rendered
//! with exactly two decimal places.
//!
//! | Command                                         | Reply                          |
//! |-------------------------------------------------|--------------------------------|
//! | `CONNECT`                                       | `OK`                           |
//! | `DISCONNECT`                                    | none required                  |
//! | `GET_JOINT_ANGLES`                              | comma separated list of angles |
//! | `SET_JOINT_ANGLE,<joint>,<angle>,<speed>`       | `OK` or an error token         |
//! | `SET_ALL_JOINT_ANGLES,<a0>,...,<aN-1>,<speed>`  | `OK` or an error token         |

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;
use std::str::FromStr;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Acknowledgement token sent by the firmware.
pub const ACK_TOKEN: &str = "OK";

/// Rejection token sent by the firmware when a command has invalid parameters.
pub const NACK_TOKEN: &str = "NG";

const CONNECT: &str = "CONNECT";
const DISCONNECT: &str = "DISCONNECT";
const GET_JOINT_ANGLES: &str = "GET_JOINT_ANGLES";
const SET_JOINT_ANGLE: &str = "SET_JOINT_ANGLE";
const SET_ALL_JOINT_ANGLES: &str = "SET_ALL_JOINT_ANGLES";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A request sent from the arm client to the firmware.
#[derive(Debug, Clone, PartialEq)]
pub enum ArmRequest {
    /// Handshake opening a logical session.
    Connect,

    /// Best-effort notification that the client is going away.
    Disconnect,

    /// Request the current angle of every joint.
    GetJointAngles,

    /// Move a single joint.
    SetJointAngle {
        joint: usize,

        /// Units: degrees
        angle_deg: f64,

        /// Units: degrees/second
        speed: f64,
    },

    /// Move every joint in one command.
    SetAllJointAngles {
        /// Units: degrees, one entry per joint
        angles_deg: Vec<f64>,

        /// Units: degrees/second
        speed: f64,
    },
}

/// A reply sent by the firmware.
#[derive(Debug, Clone, PartialEq)]
pub enum ArmReply {
    Ok,
    Rejected,
    JointAngles(Vec<f64>),
}

/// Reasons a reply could not be accepted by the client.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReplyError {
    #[error("Expected \"{expected}\" but the peer replied \"{found}\"")]
    UnexpectedReply { expected: &'static str, found: String },

    #[error("Expected {expected} joint angles but the peer sent {found}")]
    WrongAngleCount { expected: usize, found: usize },

    #[error("The peer sent an angle which is not a number: \"{0}\"")]
    InvalidAngle(String),
}

/// Reasons a received command could not be understood by the peer.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RequestParseError {
    #[error("The command is empty")]
    Empty,

    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),

    #[error("{command} expects {expected} fields, found {found}")]
    WrongFieldCount {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid value \"{0}\"")]
    InvalidField(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for ArmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmRequest::Connect => writeln!(f, "{}", CONNECT),
            ArmRequest::Disconnect => writeln!(f, "{}", DISCONNECT),
            ArmRequest::GetJointAngles => writeln!(f, "{}", GET_JOINT_ANGLES),
            ArmRequest::SetJointAngle {
                joint,
                angle_deg,
                speed,
            } => writeln!(
                f,
                "{},{},{:.2},{:.2}",
                SET_JOINT_ANGLE, joint, angle_deg, speed
            ),
            ArmRequest::SetAllJointAngles { angles_deg, speed } => {
                write!(f, "{}", SET_ALL_JOINT_ANGLES)?;
                for a in angles_deg {
                    write!(f, ",{:.2}", a)?;
                }
                writeln!(f, ",{:.2}", speed)
            }
        }
    }
}

impl FromStr for ArmRequest {
    type Err = RequestParseError;

    /// Parse a command as received by the firmware. Surrounding whitespace (including the
    /// terminating newline) is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RequestParseError::Empty);
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();

        match fields[0] {
            CONNECT => expect_fields(CONNECT, &fields, 1).map(|_| ArmRequest::Connect),
            DISCONNECT => expect_fields(DISCONNECT, &fields, 1).map(|_| ArmRequest::Disconnect),
            GET_JOINT_ANGLES => {
                expect_fields(GET_JOINT_ANGLES, &fields, 1).map(|_| ArmRequest::GetJointAngles)
            }
            SET_JOINT_ANGLE => {
                expect_fields(SET_JOINT_ANGLE, &fields, 4)?;
                Ok(ArmRequest::SetJointAngle {
                    joint: fields[1]
                        .parse()
                        .map_err(|_| RequestParseError::InvalidField(fields[1].to_string()))?,
                    angle_deg: parse_f64(fields[2])?,
                    speed: parse_f64(fields[3])?,
                })
            }
            SET_ALL_JOINT_ANGLES => {
                // At least one angle and the speed
                if fields.len() < 3 {
                    return Err(RequestParseError::WrongFieldCount {
                        command: SET_ALL_JOINT_ANGLES,
                        expected: 3,
                        found: fields.len(),
                    });
                }
                let speed = fields[fields.len() - 1];
                let angles = &fields[1..fields.len() - 1];
                Ok(ArmRequest::SetAllJointAngles {
                    angles_deg: angles
                        .iter()
                        .map(|a| parse_f64(a))
                        .collect::<Result<_, _>>()?,
                    speed: parse_f64(speed)?,
                })
            }
            other => Err(RequestParseError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for ArmReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmReply::Ok => write!(f, "{}", ACK_TOKEN),
            ArmReply::Rejected => write!(f, "{}", NACK_TOKEN),
            ArmReply::JointAngles(angles) => {
                let strs: Vec<String> = angles.iter().map(|a| format!("{:.2}", a)).collect();
                write!(f, "{}", strs.join(","))
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Check that a reply is exactly the acknowledgement token.
pub fn parse_ack(reply: &str) -> Result<(), ReplyError> {
    match reply.trim() {
        ACK_TOKEN => Ok(()),
        other => Err(ReplyError::UnexpectedReply {
            expected: ACK_TOKEN,
            found: other.to_string(),
        }),
    }
}

/// Parse a `GET_JOINT_ANGLES` reply, which must contain exactly `num_joints` angles.
pub fn parse_joint_angles(reply: &str, num_joints: usize) -> Result<Vec<f64>, ReplyError> {
    let angles = reply
        .trim()
        .split(',')
        .map(|a| {
            a.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ReplyError::InvalidAngle(a.trim().to_string()))
        })
        .collect::<Result<Vec<f64>, ReplyError>>()?;

    if angles.len() != num_joints {
        return Err(ReplyError::WrongAngleCount {
            expected: num_joints,
            found: angles.len(),
        });
    }

    Ok(angles)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn expect_fields(
    command: &'static str,
    fields: &[&str],
    expected: usize,
) -> Result<(), RequestParseError> {
    if fields.len() != expected {
        Err(RequestParseError::WrongFieldCount {
            command,
            expected,
            found: fields.len(),
        })
    } else {
        Ok(())
    }
}

fn parse_f64(s: &str) -> Result<f64, RequestParseError> {
    s.parse()
        .map_err(|_| RequestParseError::InvalidField(s.to_string()))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        assert_eq!(ArmRequest::Connect.to_string(), "CONNECT\n");
        assert_eq!(ArmRequest::Disconnect.to_string(), "DISCONNECT\n");
        assert_eq!(ArmRequest::GetJointAngles.to_string(), "GET_JOINT_ANGLES\n");
        assert_eq!(
            ArmRequest::SetJointAngle {
                joint: 2,
                angle_deg: 15.0,
                speed: 50.0
            }
            .to_string(),
            "SET_JOINT_ANGLE,2,15.00,50.00\n"
        );
        assert_eq!(
            ArmRequest::SetAllJointAngles {
                angles_deg: vec![0.0; 7],
                speed: 50.0
            }
            .to_string(),
            "SET_ALL_JOINT_ANGLES,0.00,0.00,0.00,0.00,0.00,0.00,0.00,50.00\n"
        );
    }

    #[test]
    fn test_two_decimal_rounding() {
        let req = ArmRequest::SetJointAngle {
            joint: 0,
            angle_deg: 90.126,
            speed: 12.5,
        };
        assert_eq!(req.to_string(), "SET_JOINT_ANGLE,0,90.13,12.50\n");
    }

    #[test]
    fn test_request_parse() {
        assert_eq!("CONNECT\n".parse::<ArmRequest>(), Ok(ArmRequest::Connect));
        assert_eq!(
            "SET_JOINT_ANGLE,3,-12.50,50.00".parse::<ArmRequest>(),
            Ok(ArmRequest::SetJointAngle {
                joint: 3,
                angle_deg: -12.5,
                speed: 50.0
            })
        );
        assert_eq!(
            "SET_ALL_JOINT_ANGLES,1.00,2.00,30.00\n".parse::<ArmRequest>(),
            Ok(ArmRequest::SetAllJointAngles {
                angles_deg: vec![1.0, 2.0],
                speed: 30.0
            })
        );
        assert_eq!("".parse::<ArmRequest>(), Err(RequestParseError::Empty));
        assert_eq!(
            "JUMP".parse::<ArmRequest>(),
            Err(RequestParseError::UnknownCommand("JUMP".into()))
        );
        assert!(matches!(
            "SET_JOINT_ANGLE,1,2.0".parse::<ArmRequest>(),
            Err(RequestParseError::WrongFieldCount { .. })
        ));
        assert!(matches!(
            "SET_JOINT_ANGLE,x,2.0,1.0".parse::<ArmRequest>(),
            Err(RequestParseError::InvalidField(_))
        ));
    }

    #[test]
    fn test_parse_ack() {
        assert_eq!(parse_ack("OK"), Ok(()));
        assert_eq!(parse_ack("  OK\r\n"), Ok(()));
        assert!(parse_ack("NG").is_err());
        assert!(parse_ack("OKAY").is_err());
        assert!(parse_ack("").is_err());
    }

    #[test]
    fn test_parse_joint_angles() {
        assert_eq!(
            parse_joint_angles("0.00,90.50,180.00\n", 3),
            Ok(vec![0.0, 90.5, 180.0])
        );
        assert_eq!(
            parse_joint_angles("0.00,90.50", 3),
            Err(ReplyError::WrongAngleCount {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse_joint_angles("0.00,abc,1.00", 3),
            Err(ReplyError::InvalidAngle("abc".into()))
        );
        assert!(parse_joint_angles("OK", 1).is_err());
        assert!(parse_joint_angles("NaN,1.00", 2).is_err());
    }

    #[test]
    fn test_reply_display() {
        assert_eq!(ArmReply::Ok.to_string(), "OK");
        assert_eq!(ArmReply::Rejected.to_string(), "NG");
        assert_eq!(
            ArmReply::JointAngles(vec![0.0, 45.5]).to_string(),
            "0.00,45.50"
        );
    }
}

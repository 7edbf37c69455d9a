//! # Simulated Arm
//!
//! Joint state of the simulated arm and the command interpreter acting on it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::arm::{ArmReply, ArmRequest, RequestParseError};
use log::{debug, warn};
use util::maths;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A simulated arm. Joints start at zero and move instantly to their demanded angle.
#[derive(Debug, Clone)]
pub struct SimArm {
    angles_deg: Vec<f64>,

    max_angle_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimArm {
    pub fn new(num_joints: usize, max_angle_deg: f64) -> Self {
        Self {
            angles_deg: vec![0.0; num_joints],
            max_angle_deg,
        }
    }

    /// Current angle of every joint.
    pub fn angles_deg(&self) -> &[f64] {
        &self.angles_deg
    }

    /// Handle a single received command, returning the reply to send if any.
    ///
    /// Unknown commands get no reply. Known commands with bad parameters are rejected.
    pub fn handle(&mut self, command: &str) -> Option<ArmReply> {
        let request = match command.parse::<ArmRequest>() {
            Ok(r) => r,
            Err(e @ RequestParseError::Empty) | Err(e @ RequestParseError::UnknownCommand(_)) => {
                warn!("Ignoring command {:?}: {}", command, e);
                return None;
            }
            Err(e) => {
                warn!("Rejecting command {:?}: {}", command, e);
                return Some(ArmReply::Rejected);
            }
        };

        debug!("Handling {:?}", request);

        let reply = match request {
            ArmRequest::Connect | ArmRequest::Disconnect => ArmReply::Ok,
            ArmRequest::GetJointAngles => ArmReply::JointAngles(self.angles_deg.clone()),
            ArmRequest::SetJointAngle {
                joint, angle_deg, ..
            } => match self.angles_deg.get_mut(joint) {
                Some(a) => {
                    *a = clamp_angle(angle_deg, self.max_angle_deg);
                    ArmReply::Ok
                }
                None => ArmReply::Rejected,
            },
            ArmRequest::SetAllJointAngles { angles_deg, .. } => {
                if angles_deg.len() == self.angles_deg.len() {
                    for (a, demand) in self.angles_deg.iter_mut().zip(angles_deg) {
                        *a = clamp_angle(demand, self.max_angle_deg);
                    }
                    ArmReply::Ok
                } else {
                    ArmReply::Rejected
                }
            }
        };

        Some(reply)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn clamp_angle(angle_deg: f64, max_angle_deg: f64) -> f64 {
    if angle_deg.is_nan() {
        return 0.0;
    }
    maths::clamp(angle_deg, 0.0, max_angle_deg)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_handshake() {
        let mut arm = SimArm::new(7, 180.0);

        assert_eq!(arm.handle("CONNECT\n"), Some(ArmReply::Ok));
        assert_eq!(arm.handle("DISCONNECT\n"), Some(ArmReply::Ok));
        assert_eq!(arm.handle("HELLO\n"), None);
        assert_eq!(arm.handle("\n"), None);
    }

    #[test]
    fn test_set_joint_angle() {
        let mut arm = SimArm::new(3, 180.0);

        assert_eq!(arm.handle("SET_JOINT_ANGLE,1,45.50,50.00\n"), Some(ArmReply::Ok));
        assert_eq!(arm.handle("SET_JOINT_ANGLE,2,200.00,50.00\n"), Some(ArmReply::Ok));
        assert_eq!(arm.handle("SET_JOINT_ANGLE,0,-10.00,50.00\n"), Some(ArmReply::Ok));
        assert_eq!(arm.angles_deg(), &[0.0, 45.5, 180.0]);

        assert_eq!(
            arm.handle("SET_JOINT_ANGLE,3,10.00,50.00\n"),
            Some(ArmReply::Rejected)
        );
        assert_eq!(arm.handle("SET_JOINT_ANGLE,1,10.00\n"), Some(ArmReply::Rejected));

        assert_eq!(
            arm.handle("GET_JOINT_ANGLES\n").map(|r| r.to_string()),
            Some(String::from("0.00,45.50,180.00"))
        );
    }

    #[test]
    fn test_set_all_joint_angles() {
        let mut arm = SimArm::new(2, 180.0);

        assert_eq!(
            arm.handle("SET_ALL_JOINT_ANGLES,10.00,20.00,50.00\n"),
            Some(ArmReply::Ok)
        );
        assert_eq!(arm.angles_deg(), &[10.0, 20.0]);

        assert_eq!(
            arm.handle("SET_ALL_JOINT_ANGLES,10.00,50.00\n"),
            Some(ArmReply::Rejected)
        );
        assert_eq!(arm.angles_deg(), &[10.0, 20.0]);
    }
}

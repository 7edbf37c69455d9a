//! Motion primitives of the arm client
//!
//! All motion calls require a connected client and a valid joint index, and check the
//! transmitted angle (operator target plus offset) against the joint's limit before any command
//! is sent.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, warn};
use std::thread;

use comms_if::{
    eqpt::arm::{self, ArmRequest},
    net::Transport,
};
use util::{maths, time};

use super::{ArmClient, ArmClientError};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T: Transport> ArmClient<T> {
    /// Move a joint in a single command, requiring the arm to acknowledge it.
    ///
    /// The joint's estimate is only updated once the arm replies `OK`.
    pub fn set_unsafe(
        &mut self,
        joint: usize,
        target_deg: f64,
        speed: f64,
    ) -> Result<(), ArmClientError> {
        self.ensure_connected()?;
        let effective = self.joints.effective_angle(joint, target_deg)?;
        check_speed(speed)?;

        self.request_ack(&ArmRequest::SetJointAngle {
            joint,
            angle_deg: effective,
            speed,
        })?;

        self.joints.set_current(joint, effective)?;
        debug!("Joint {} moved to {:.2}", joint, effective);

        Ok(())
    }

    /// Move a joint towards the target in steps of at most `step_deg`, pausing `delay_s` between
    /// steps.
    ///
    /// The joint must currently be within its limit, a joint left outside it (e.g. after the limit
    /// was narrowed) can only be brought back with [`ArmClient::set_unsafe`].
    ///
    /// Every step is sent and the joint's estimate updated whatever the arm replies, an
    /// unacknowledged step is only logged. Once started the move always runs to the target and
    /// ends with the estimate equal to the transmitted target.
    pub fn set_stepwise(
        &mut self,
        joint: usize,
        target_deg: f64,
        speed: f64,
        step_deg: f64,
        delay_s: f64,
    ) -> Result<(), ArmClientError> {
        self.ensure_connected()?;
        self.joints.get(joint)?;

        if !(step_deg.is_finite() && step_deg > 0.0) {
            return Err(ArmClientError::InvalidArgument(format!(
                "step size must be a positive number of degrees, found {}",
                step_deg
            )));
        }
        if !(delay_s.is_finite() && delay_s >= 0.0) {
            return Err(ArmClientError::InvalidArgument(format!(
                "step delay must not be negative, found {}",
                delay_s
            )));
        }
        check_speed(speed)?;

        let effective = self.joints.effective_angle(joint, target_deg)?;
        let state = self.joints.get(joint)?;
        let start = state.current_angle_deg;

        // Every step lies between the start and the target, so both within the limit keeps every
        // transmitted angle within it
        if !state.limit.contains(start) {
            return Err(ArmClientError::LimitViolation {
                joint,
                angle: start,
                min: state.limit.min_deg(),
                max: state.limit.max_deg(),
            });
        }

        if effective == start {
            return Ok(());
        }

        let delay = time::seconds_to_duration(delay_s);
        let mut current = start;
        let mut num_steps = 0usize;
        let mut num_unacked = 0usize;

        while current != effective {
            let next = maths::step_towards(current, effective, step_deg);

            // A step below the float resolution of the angle would never arrive
            current = if next == current { effective } else { next };

            let request = ArmRequest::SetJointAngle {
                joint,
                angle_deg: current,
                speed,
            };

            let ack = self
                .transport
                .send_and_await(&request.to_string())
                .map_err(ArmClientError::from)
                .and_then(|reply| arm::parse_ack(&reply).map_err(ArmClientError::from));

            if let Err(e) = ack {
                num_unacked += 1;
                warn!("Joint {} step to {:.2} not acknowledged: {}", joint, current, e);
            }

            self.joints.set_current(joint, current)?;
            num_steps += 1;

            if current != effective {
                thread::sleep(delay);
            }
        }

        debug!(
            "Joint {} stepped from {:.2} to {:.2} in {} step(s), {} unacknowledged",
            joint, start, effective, num_steps, num_unacked
        );

        Ok(())
    }

    /// Move every joint in one command.
    ///
    /// All targets are checked before anything is sent, a single bad target fails the whole call.
    /// The estimates are updated together once the arm replies `OK`.
    pub fn set_all(&mut self, targets_deg: &[f64], speed: f64) -> Result<(), ArmClientError> {
        self.ensure_connected()?;

        if targets_deg.len() != self.joints.len() {
            return Err(ArmClientError::InvalidArgument(format!(
                "expected {} target angles, found {}",
                self.joints.len(),
                targets_deg.len()
            )));
        }

        let effective = targets_deg
            .iter()
            .enumerate()
            .map(|(joint, target)| self.joints.effective_angle(joint, *target))
            .collect::<Result<Vec<f64>, _>>()?;
        check_speed(speed)?;

        self.request_ack(&ArmRequest::SetAllJointAngles {
            angles_deg: effective.clone(),
            speed,
        })?;

        self.joints.set_all_current(&effective)?;
        debug!("All joints moved to {:?}", effective);

        Ok(())
    }

    /// Visit each point of a trajectory in order with [`ArmClient::set_all`], pausing between
    /// points.
    ///
    /// Stops at the first point which fails, the arm is left at the last point reached.
    pub fn execute_trajectory(
        &mut self,
        points: &[Vec<f64>],
        speed: f64,
    ) -> Result<(), ArmClientError> {
        self.ensure_connected()?;

        if let Some((i, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| p.len() != self.joints.len())
        {
            return Err(ArmClientError::InvalidArgument(format!(
                "trajectory point {} has {} angles, expected {}",
                i,
                p.len(),
                self.joints.len()
            )));
        }

        let pause = time::seconds_to_duration(self.motion.trajectory_pause_s);

        for (i, point) in points.iter().enumerate() {
            if i > 0 {
                thread::sleep(pause);
            }

            if let Err(e) = self.set_all(point, speed) {
                warn!(
                    "Trajectory stopped at point {} of {}: {}",
                    i + 1,
                    points.len(),
                    e
                );
                return Err(e);
            }
        }

        debug!("Trajectory of {} point(s) complete", points.len());

        Ok(())
    }

    /// Move every joint to zero at the default speed.
    pub fn move_to_home(&mut self) -> Result<(), ArmClientError> {
        let home = vec![0.0; self.joints.len()];
        self.set_all(&home, self.motion.speed)
    }

    /// Stepwise move of a joint using the default speed, step and delay.
    pub fn set_joint_angle(&mut self, joint: usize, target_deg: f64) -> Result<(), ArmClientError> {
        let (speed, step_deg, delay_s) = (
            self.motion.speed,
            self.motion.step_deg,
            self.motion.step_delay_s,
        );
        self.set_stepwise(joint, target_deg, speed, step_deg, delay_s)
    }

    /// Single command move of a joint using the default speed.
    pub fn set_joint_angle_unsafe(
        &mut self,
        joint: usize,
        target_deg: f64,
    ) -> Result<(), ArmClientError> {
        self.set_unsafe(joint, target_deg, self.motion.speed)
    }

    /// Move every joint using the default speed.
    pub fn set_all_joint_angles(&mut self, targets_deg: &[f64]) -> Result<(), ArmClientError> {
        self.set_all(targets_deg, self.motion.speed)
    }

    /// Send a request and require the arm to acknowledge it.
    fn request_ack(&mut self, request: &ArmRequest) -> Result<(), ArmClientError> {
        let reply = self.transport.send_and_await(&request.to_string())?;
        arm::parse_ack(&reply)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_speed(speed: f64) -> Result<(), ArmClientError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(ArmClientError::InvalidArgument(format!(
            "speed must be a positive number, found {}",
            speed
        )))
    }
}

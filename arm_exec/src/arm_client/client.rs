//! Connection lifecycle and configuration of the arm client

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info, warn};

use comms_if::{
    eqpt::arm::{self, ArmRequest},
    net::{Transport, UdpTransport},
};

use super::{ArmClientError, JointLimit, JointTable};
use crate::params::{ArmExecParams, JointParams, MotionParams};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Client controlling one arm over a [`Transport`].
pub struct ArmClient<T: Transport> {
    pub(super) transport: T,

    pub(super) joints: JointTable,

    pub(super) motion: MotionParams,

    state: SessionState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Logical session with the arm firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ArmClient<UdpTransport> {
    /// Build a disconnected UDP client from the executable's parameters.
    ///
    /// Joint configuration is not applied here, see [`ArmClient::configure_joints`].
    pub fn from_params(params: &ArmExecParams) -> Self {
        Self::new(
            UdpTransport::new(params.net.clone()),
            params.num_joints,
            params.motion.clone(),
        )
    }
}

impl<T: Transport> ArmClient<T> {
    /// Create a new disconnected client.
    pub fn new(transport: T, num_joints: usize, motion: MotionParams) -> Self {
        Self {
            transport,
            joints: JointTable::new(num_joints),
            motion,
            state: SessionState::Disconnected,
        }
    }

    /// Perform the connection handshake.
    ///
    /// On success the joint angles are refreshed from the arm. A bad refresh is only logged, the
    /// connection is still considered established. On failure the client stays disconnected and
    /// `connect` can simply be called again. Calling this while connected does nothing.
    pub fn connect(&mut self) -> Result<(), ArmClientError> {
        if self.is_connected() {
            debug!("Already connected to the arm");
            return Ok(());
        }

        self.transport.open()?;

        let handshake = self
            .transport
            .send_and_await(&ArmRequest::Connect.to_string())
            .map_err(ArmClientError::from)
            .and_then(|reply| arm::parse_ack(&reply).map_err(ArmClientError::from));

        if let Err(e) = handshake {
            warn!("Connection handshake failed: {}", e);
            self.transport.close();
            return Err(e);
        }

        self.state = SessionState::Connected;
        info!("Connected to the arm");

        self.try_refresh_joint_angles();

        Ok(())
    }

    /// Leave the session with the arm.
    ///
    /// The disconnect notification is best-effort, the transport is always released. Calling this
    /// while disconnected does nothing.
    pub fn disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }

        if let Err(e) = self
            .transport
            .send(&ArmRequest::Disconnect.to_string())
        {
            debug!("Disconnect notification not sent: {}", e);
        }

        self.transport.close();
        self.state = SessionState::Disconnected;

        info!("Disconnected from the arm");
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    /// Read access to the joint state table.
    pub fn joint_table(&self) -> &JointTable {
        &self.joints
    }

    /// Read access to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pull every joint angle from the arm into the joint table.
    ///
    /// The table is only updated if the reply holds exactly one valid angle per joint.
    pub fn refresh_joint_angles(&mut self) -> Result<(), ArmClientError> {
        self.ensure_connected()?;

        let reply = self
            .transport
            .send_and_await(&ArmRequest::GetJointAngles.to_string())?;
        let angles = arm::parse_joint_angles(&reply, self.joints.len())?;

        self.joints.set_all_current(&angles)
    }

    /// Get the angle of a single joint, refreshed from the arm.
    ///
    /// If the refresh fails the last estimate is returned.
    pub fn get_joint_angle(&mut self, joint: usize) -> Result<f64, ArmClientError> {
        self.ensure_connected()?;
        self.joints.get(joint)?;

        self.try_refresh_joint_angles();

        Ok(self.joints.get(joint)?.current_angle_deg)
    }

    /// Get the angle of every joint.
    ///
    /// While connected the angles are refreshed from the arm first, while disconnected the last
    /// estimates are returned.
    pub fn get_all_joint_angles(&mut self) -> Vec<f64> {
        if self.is_connected() {
            self.try_refresh_joint_angles();
        }

        self.joints.current_angles()
    }

    /// Set the inclusive limits of a joint.
    pub fn set_joint_limits(
        &mut self,
        joint: usize,
        min_deg: f64,
        max_deg: f64,
    ) -> Result<(), ArmClientError> {
        self.joints.get(joint)?;
        let limit = JointLimit::new(min_deg, max_deg)?;
        self.joints.set_limit(joint, limit)?;

        debug!(
            "Joint {} limits set to [{:.2}, {:.2}]",
            joint, min_deg, max_deg
        );

        Ok(())
    }

    /// Set the calibration offset of a joint.
    pub fn set_joint_offset(&mut self, joint: usize, offset_deg: f64) -> Result<(), ArmClientError> {
        self.joints.set_offset(joint, offset_deg)?;

        debug!("Joint {} offset set to {:.2}", joint, offset_deg);

        Ok(())
    }

    /// Apply a list of joint configurations, entry `i` configures joint `i`.
    ///
    /// Every entry is validated before any is applied.
    pub fn configure_joints(&mut self, joints: &[JointParams]) -> Result<(), ArmClientError> {
        if joints.len() > self.joints.len() {
            return Err(ArmClientError::InvalidJointIndex {
                joint: joints.len() - 1,
                num_joints: self.joints.len(),
            });
        }

        let limits = joints
            .iter()
            .map(|j| JointLimit::new(j.min_deg, j.max_deg))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(bad) = joints.iter().find(|j| !j.offset_deg.is_finite()) {
            return Err(ArmClientError::InvalidArgument(format!(
                "joint offsets must be finite, found {}",
                bad.offset_deg
            )));
        }

        for (i, (joint, limit)) in joints.iter().zip(limits).enumerate() {
            self.joints.set_limit(i, limit)?;
            self.joints.set_offset(i, joint.offset_deg)?;
        }

        info!("Configured {} joint(s)", joints.len());

        Ok(())
    }

    pub(super) fn ensure_connected(&self) -> Result<(), ArmClientError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ArmClientError::NotConnected)
        }
    }

    /// Refresh the joint angles, logging rather than returning a failure.
    fn try_refresh_joint_angles(&mut self) {
        if let Err(e) = self.refresh_joint_angles() {
            warn!("Could not refresh the joint angles, keeping estimates: {}", e);
        }
    }
}

impl<T: Transport> Drop for ArmClient<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

//! Joint state table

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::ArmClientError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lower limit given to a joint which has not been configured.
///
/// Units: degrees
pub const DEFAULT_MIN_DEG: f64 = -180.0;

/// Upper limit given to a joint which has not been configured.
///
/// Units: degrees
pub const DEFAULT_MAX_DEG: f64 = 180.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Inclusive angle bound of a joint. `min_deg < max_deg` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimit {
    min_deg: f64,
    max_deg: f64,
}

/// Everything the client knows about a single joint.
#[derive(Debug, Clone, PartialEq)]
pub struct JointState {
    /// Last angle the client believes the joint is at. This is the transmitted angle, i.e. it
    /// already includes the offset.
    ///
    /// Units: degrees
    pub current_angle_deg: f64,

    /// Calibration offset added to every operator target before transmission.
    ///
    /// Units: degrees
    pub offset_deg: f64,

    /// Limit every transmitted angle must lie within
    pub limit: JointLimit,
}

/// The per-joint state of the whole arm.
///
/// The table has no synchronisation of its own, it is owned by exactly one client.
#[derive(Debug, Clone)]
pub struct JointTable {
    joints: Vec<JointState>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointLimit {
    /// Create a new limit, `min_deg` must be strictly less than `max_deg`.
    pub fn new(min_deg: f64, max_deg: f64) -> Result<Self, ArmClientError> {
        // Written so that NaN on either side is rejected too
        if !(min_deg < max_deg) {
            return Err(ArmClientError::InvalidLimitConfiguration {
                min: min_deg,
                max: max_deg,
            });
        }

        Ok(Self { min_deg, max_deg })
    }

    pub fn min_deg(&self) -> f64 {
        self.min_deg
    }

    pub fn max_deg(&self) -> f64 {
        self.max_deg
    }

    /// Return true if the angle lies within the limit. NaN is never within a limit.
    pub fn contains(&self, angle_deg: f64) -> bool {
        angle_deg >= self.min_deg && angle_deg <= self.max_deg
    }
}

impl Default for JointLimit {
    fn default() -> Self {
        Self {
            min_deg: DEFAULT_MIN_DEG,
            max_deg: DEFAULT_MAX_DEG,
        }
    }
}

impl Default for JointState {
    fn default() -> Self {
        Self {
            current_angle_deg: 0.0,
            offset_deg: 0.0,
            limit: JointLimit::default(),
        }
    }
}

impl JointTable {
    /// Create a table of `num_joints` unconfigured joints, all believed to be at zero.
    pub fn new(num_joints: usize) -> Self {
        Self {
            joints: vec![JointState::default(); num_joints],
        }
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Get the state of a joint.
    pub fn get(&self, joint: usize) -> Result<&JointState, ArmClientError> {
        let num_joints = self.joints.len();
        self.joints
            .get(joint)
            .ok_or(ArmClientError::InvalidJointIndex { joint, num_joints })
    }

    /// Iterate over all joint states in index order.
    pub fn iter(&self) -> impl Iterator<Item = &JointState> {
        self.joints.iter()
    }

    /// The current angle estimate of every joint.
    pub fn current_angles(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.current_angle_deg).collect()
    }

    /// Compute the angle which would be transmitted for an operator target, checking it against
    /// the joint's limit.
    pub fn effective_angle(&self, joint: usize, target_deg: f64) -> Result<f64, ArmClientError> {
        let state = self.get(joint)?;
        let effective = target_deg + state.offset_deg;

        if !state.limit.contains(effective) {
            return Err(ArmClientError::LimitViolation {
                joint,
                angle: effective,
                min: state.limit.min_deg,
                max: state.limit.max_deg,
            });
        }

        Ok(effective)
    }

    pub fn set_limit(&mut self, joint: usize, limit: JointLimit) -> Result<(), ArmClientError> {
        self.get_mut(joint)?.limit = limit;
        Ok(())
    }

    pub fn set_offset(&mut self, joint: usize, offset_deg: f64) -> Result<(), ArmClientError> {
        if !offset_deg.is_finite() {
            return Err(ArmClientError::InvalidArgument(format!(
                "offset of joint {} must be finite, found {}",
                joint, offset_deg
            )));
        }

        self.get_mut(joint)?.offset_deg = offset_deg;
        Ok(())
    }

    pub fn set_current(&mut self, joint: usize, angle_deg: f64) -> Result<(), ArmClientError> {
        self.get_mut(joint)?.current_angle_deg = angle_deg;
        Ok(())
    }

    /// Overwrite every current angle in one update. The number of angles must match the number
    /// of joints, otherwise nothing is changed.
    pub fn set_all_current(&mut self, angles_deg: &[f64]) -> Result<(), ArmClientError> {
        if angles_deg.len() != self.joints.len() {
            return Err(ArmClientError::InvalidArgument(format!(
                "expected {} angles, found {}",
                self.joints.len(),
                angles_deg.len()
            )));
        }

        for (state, angle) in self.joints.iter_mut().zip(angles_deg) {
            state.current_angle_deg = *angle;
        }

        Ok(())
    }

    fn get_mut(&mut self, joint: usize) -> Result<&mut JointState, ArmClientError> {
        let num_joints = self.joints.len();
        self.joints
            .get_mut(joint)
            .ok_or(ArmClientError::InvalidJointIndex { joint, num_joints })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_limit_validation() {
        assert!(JointLimit::new(0.0, 180.0).is_ok());
        assert!(matches!(
            JointLimit::new(10.0, 10.0),
            Err(ArmClientError::InvalidLimitConfiguration { .. })
        ));
        assert!(matches!(
            JointLimit::new(90.0, -90.0),
            Err(ArmClientError::InvalidLimitConfiguration { .. })
        ));
        assert!(JointLimit::new(std::f64::NAN, 1.0).is_err());

        let limit = JointLimit::new(0.0, 180.0).unwrap();
        assert!(limit.contains(0.0));
        assert!(limit.contains(180.0));
        assert!(!limit.contains(180.01));
        assert!(!limit.contains(std::f64::NAN));
    }

    #[test]
    fn test_effective_angle() {
        let mut table = JointTable::new(3);
        table.set_limit(1, JointLimit::new(0.0, 180.0).unwrap()).unwrap();
        table.set_offset(1, 5.0).unwrap();

        assert_eq!(table.effective_angle(1, 10.0).unwrap(), 15.0);
        assert!(matches!(
            table.effective_angle(1, 176.0),
            Err(ArmClientError::LimitViolation { joint: 1, .. })
        ));
        assert!(matches!(
            table.effective_angle(3, 0.0),
            Err(ArmClientError::InvalidJointIndex {
                joint: 3,
                num_joints: 3
            })
        ));

        // Unconfigured joints use the default limit
        assert_eq!(table.effective_angle(0, -180.0).unwrap(), -180.0);
        assert!(table.effective_angle(0, 180.5).is_err());
    }

    #[test]
    fn test_set_all_current() {
        let mut table = JointTable::new(2);

        assert!(table.set_all_current(&[1.0]).is_err());
        assert_eq!(table.current_angles(), vec![0.0, 0.0]);

        table.set_all_current(&[1.0, 2.0]).unwrap();
        assert_eq!(table.current_angles(), vec![1.0, 2.0]);

        assert!(table.set_offset(0, std::f64::INFINITY).is_err());
        assert_eq!(table.get(0).unwrap().offset_deg, 0.0);
    }
}

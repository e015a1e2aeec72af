use ur3_core::Joint;

/// Last applied absolute angle of each pivoted joint.
///
/// The skeleton only accepts incremental rotations while the control surface
/// reports absolute angles. The stored angle is what turns the next absolute
/// angle into an increment. The base is not tracked here, it is set directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JointAngleState {
    angles: [f32; 5],
}

impl JointAngleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied angle, `None` for the base.
    pub fn angle(&self, joint: Joint) -> Option<f32> {
        joint.pivot_index().map(|idx| self.angles[idx])
    }

    /// Store a new absolute angle and return the increment from the previous
    /// one. Returns `None` for the base.
    pub fn update(&mut self, joint: Joint, value: f32) -> Option<f32> {
        let idx = joint.pivot_index()?;

        let delta = value - self.angles[idx];
        self.angles[idx] = value;

        Some(delta)
    }
}

impl std::fmt::Display for JointAngleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (joint, angle) in Joint::PIVOTED.iter().zip(self.angles) {
            write!(f, "{}={:.2}rad/{:5.1}° ", joint, angle, angle.to_degrees())?;
        }

        Ok(())
    }
}

use serde::Deserialize;

/// Rotational degree of freedom of the arm.
///
/// The declaration order follows the kinematic chain from the base towards
/// the tool and doubles as the joint index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Joint {
    /// Rotates the whole arm around the vertical axis.
    Base,
    Shoulder,
    Elbow,
    Wrist1,
    Wrist2,
    Wrist3,
}

impl Joint {
    /// All joints, base first.
    pub const ALL: [Joint; 6] = [
        Joint::Base,
        Joint::Shoulder,
        Joint::Elbow,
        Joint::Wrist1,
        Joint::Wrist2,
        Joint::Wrist3,
    ];

    /// Joints that rotate their link about a pivot point.
    pub const PIVOTED: [Joint; 5] = [
        Joint::Shoulder,
        Joint::Elbow,
        Joint::Wrist1,
        Joint::Wrist2,
        Joint::Wrist3,
    ];

    /// Position of the joint in the chain.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Position of the joint among the pivoted joints.
    ///
    /// The base rotates its own frame directly and has no pivot index.
    pub fn pivot_index(&self) -> Option<usize> {
        match self {
            Joint::Base => None,
            joint => Some(joint.index() - 1),
        }
    }

    #[inline]
    pub fn is_base(&self) -> bool {
        *self == Joint::Base
    }

    /// Control panel label.
    pub fn label(&self) -> &'static str {
        match self {
            Joint::Base => "Base",
            Joint::Shoulder => "Shoulder",
            Joint::Elbow => "Elbow",
            Joint::Wrist1 => "Wrist_1",
            Joint::Wrist2 => "Wrist_2",
            Joint::Wrist3 => "Wrist_3",
        }
    }
}

impl TryFrom<usize> for Joint {
    type Error = ();

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Joint::ALL.get(value).copied().ok_or(())
    }
}

impl std::str::FromStr for Joint {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" | "joint_1" => Ok(Joint::Base),
            "shoulder" | "joint_2" => Ok(Joint::Shoulder),
            "elbow" | "joint_3" => Ok(Joint::Elbow),
            "wrist1" | "wrist_1" | "joint_4" => Ok(Joint::Wrist1),
            "wrist2" | "wrist_2" | "joint_5" => Ok(Joint::Wrist2),
            "wrist3" | "wrist_3" | "joint_6" => Ok(Joint::Wrist3),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sign applied to an angle delta before it reaches the skeleton.
///
/// The skeleton axes are derived per segment and do not share a common
/// handedness with the mesh, so each joint carries its own sense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationSense {
    #[default]
    Direct,
    Inverse,
}

impl RotationSense {
    #[inline]
    pub fn apply(&self, delta: f32) -> f32 {
        match self {
            RotationSense::Direct => delta,
            RotationSense::Inverse => -delta,
        }
    }
}

/// Absolute joint angle request.
///
/// The angle is the total rotation from rest in radians, not an increment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointCommand {
    pub joint: Joint,
    pub angle: f32,
}

impl JointCommand {
    pub fn new(joint: Joint, angle: f32) -> Self {
        Self { joint, angle }
    }
}

impl std::fmt::Display for JointCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={:.3}rad/{:.1}°",
            self.joint,
            self.angle,
            self.angle.to_degrees()
        )
    }
}

use std::ops::RangeInclusive;

use ur3_core::{Joint, JointCommand};

/// Angle range offered by a joint slider, in radians.
pub const SLIDER_RANGE: RangeInclusive<f32> = -std::f32::consts::PI..=std::f32::consts::PI;

/// Request from the control surface to the frame loop.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlCommand {
    /// Set one joint to an absolute angle.
    SetJoint(JointCommand),
    /// Set all joints to absolute angles, base first.
    Move([f32; 6]),
    /// Move to the configured home pose.
    Home,
    ToggleHitboxes,
    ToggleRobot,
    ToggleLinkChain,
    /// Log the current joint angles.
    Status,
}

impl From<JointCommand> for ControlCommand {
    fn from(value: JointCommand) -> Self {
        ControlCommand::SetJoint(value)
    }
}

fn parse_angle(value: &str, line: &str) -> crate::Result<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|angle| angle.is_finite())
        .ok_or_else(|| crate::Error::InvalidCommand(line.to_string()))
}

impl std::str::FromStr for ControlCommand {
    type Err = crate::Error;

    /// Parse the text form used by the debug panel.
    ///
    /// ```text
    /// <joint> <radians>
    /// move <r1> <r2> <r3> <r4> <r5> <r6>
    /// home
    /// toggle hitboxes|robot|chain
    /// status
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let invalid = || crate::Error::InvalidCommand(line.to_string());

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((keyword, arguments)) = tokens.split_first() else {
            return Err(invalid());
        };

        match (keyword.to_ascii_lowercase().as_str(), arguments) {
            ("home", []) => Ok(ControlCommand::Home),
            ("status", []) => Ok(ControlCommand::Status),
            ("toggle", [target]) => match target.to_ascii_lowercase().as_str() {
                "hitboxes" | "hitbox" => Ok(ControlCommand::ToggleHitboxes),
                "robot" => Ok(ControlCommand::ToggleRobot),
                "chain" | "linkchain" => Ok(ControlCommand::ToggleLinkChain),
                _ => Err(invalid()),
            },
            ("move", angles) if angles.len() == 6 => {
                let mut pose = [0.0; 6];
                for (slot, value) in pose.iter_mut().zip(angles) {
                    *slot = parse_angle(value, line)?;
                }

                Ok(ControlCommand::Move(pose))
            }
            (_, [value]) => {
                let joint = keyword.parse::<Joint>().map_err(|_| invalid())?;

                Ok(ControlCommand::SetJoint(JointCommand::new(
                    joint,
                    parse_angle(value, line)?,
                )))
            }
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlCommand::SetJoint(command) => write!(f, "Set joint {}", command),
            ControlCommand::Move(pose) => write!(
                f,
                "Move to [{:.3}, {:.3}, {:.3}, {:.3}, {:.3}, {:.3}]",
                pose[0], pose[1], pose[2], pose[3], pose[4], pose[5]
            ),
            ControlCommand::Home => write!(f, "Home"),
            ControlCommand::ToggleHitboxes => write!(f, "Toggle hitboxes"),
            ControlCommand::ToggleRobot => write!(f, "Toggle robot"),
            ControlCommand::ToggleLinkChain => write!(f, "Toggle link chain"),
            ControlCommand::Status => write!(f, "Status"),
        }
    }
}

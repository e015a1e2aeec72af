use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize};
use ur3_core::{Joint, RotationSense};

use crate::robot::Dimensions;

/// Load a TOML configuration file.
pub fn from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> crate::Result<T> {
    let contents = std::fs::read_to_string(path)?;

    Ok(toml::from_str(&contents)?)
}

pub trait Configurable: Clone {
    fn robot(&self) -> &RobotConfig;
}

/// Rotation sense of each pivoted joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JointSense {
    pub shoulder: RotationSense,
    pub elbow: RotationSense,
    pub wrist1: RotationSense,
    pub wrist2: RotationSense,
    pub wrist3: RotationSense,
}

impl JointSense {
    /// Sense of a joint. The base is always direct.
    pub fn get(&self, joint: Joint) -> RotationSense {
        match joint {
            Joint::Base => RotationSense::Direct,
            Joint::Shoulder => self.shoulder,
            Joint::Elbow => self.elbow,
            Joint::Wrist1 => self.wrist1,
            Joint::Wrist2 => self.wrist2,
            Joint::Wrist3 => self.wrist3,
        }
    }
}

impl Default for JointSense {
    fn default() -> Self {
        Self {
            shoulder: RotationSense::Inverse,
            elbow: RotationSense::Direct,
            wrist1: RotationSense::Inverse,
            wrist2: RotationSense::Inverse,
            wrist3: RotationSense::Inverse,
        }
    }
}

/// Colours are `0xRRGGBB`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub line_color: u32,
    pub line_thickness: f32,
    pub hitbox_color: u32,
    /// Hitbox colour once touched by a collision detector.
    pub hitbox_color_touched: u32,
    pub hitbox_opacity: f32,
    pub marker_color: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            line_color: 0xff0000,
            line_thickness: 0.003,
            hitbox_color: 0xffffff,
            hitbox_color_touched: 0xff0000,
            hitbox_opacity: 0.2,
            marker_color: 0x000000,
        }
    }
}

/// Initial visibility flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Visibility {
    pub hitboxes: bool,
    pub robot: bool,
    pub link_chain: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            hitboxes: false,
            robot: true,
            link_chain: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Name of the robot root node in the asset.
    pub root_node: String,
    /// Names of the six joint nodes in the asset, base first.
    pub joint_nodes: [String; 6],
    pub dimensions: Dimensions,
    pub sense: JointSense,
    /// Joint angles applied on `home`, base first.
    pub home: [f32; 6],
    pub style: RenderStyle,
    pub visibility: Visibility,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            root_node: "UR3".to_string(),
            joint_nodes: std::array::from_fn(|idx| format!("Joint_{}", idx + 1)),
            dimensions: Dimensions::default(),
            sense: JointSense::default(),
            home: [0.0; 6],
            style: RenderStyle::default(),
            visibility: Visibility::default(),
        }
    }
}

impl Configurable for RobotConfig {
    fn robot(&self) -> &RobotConfig {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: RobotConfig = toml::from_str("").unwrap();

        assert_eq!(config, RobotConfig::default());
        assert_eq!(config.joint_nodes[0], "Joint_1");
        assert_eq!(config.joint_nodes[5], "Joint_6");
        assert_eq!(config.sense.get(Joint::Shoulder), RotationSense::Inverse);
        assert_eq!(config.sense.get(Joint::Elbow), RotationSense::Direct);
        assert!(!config.visibility.hitboxes);
    }

    #[test]
    fn test_partial_override() {
        let config: RobotConfig = toml::from_str(
            r#"
            root_node = "Arm"
            home = [0.0, -1.5707964, 0.0, -1.5707964, 0.0, 0.0]

            [dimensions]
            forearm = 0.3

            [sense]
            elbow = "inverse"

            [visibility]
            hitboxes = true
            "#,
        )
        .unwrap();

        assert_eq!(config.root_node, "Arm");
        assert_eq!(config.dimensions.forearm, 0.3);
        assert_eq!(config.dimensions.upper_arm, 0.24365);
        assert_eq!(config.sense.elbow, RotationSense::Inverse);
        assert_eq!(config.sense.shoulder, RotationSense::Inverse);
        assert!(config.visibility.hitboxes);
        assert!(config.visibility.robot);
        assert!((config.home[1] + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config() {
        assert!(toml::from_str::<RobotConfig>("home = 1").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            from_file::<RobotConfig>("/nonexistent/ur3.toml"),
            Err(crate::Error::Io(_))
        ));
    }
}

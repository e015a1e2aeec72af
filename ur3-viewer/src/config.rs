use std::path::PathBuf;

use ur3::{Configurable, RobotConfig};

#[derive(Clone, Debug, serde_derive::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Robot asset, glTF or GLB.
    pub asset: PathBuf,
    /// Frames per second.
    pub frame_rate: u32,
    /// Joint program played back on start.
    pub program: Option<PathBuf>,
    /// Robot configuration.
    pub robot: RobotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset: PathBuf::from("assets/ur/ur3.glb"),
            frame_rate: ur3::consts::DEFAULT_FRAME_RATE,
            program: None,
            robot: RobotConfig::default(),
        }
    }
}

impl Configurable for Config {
    fn robot(&self) -> &RobotConfig {
        &self.robot
    }
}

use std::{error, fmt};

use ur3_core::Joint;

use crate::scene::NodeId;

#[derive(Debug)]
pub enum Error {
    /// File could not be read.
    Io(std::io::Error),
    /// Asset is not a valid glTF document.
    Asset(gltf::Error),
    /// Asset node hierarchy is not a tree.
    InvalidAsset(String),
    /// Asset lacks an expected named node.
    MissingNode(String),
    /// Link dimension is not a finite number.
    InvalidDimension { name: &'static str, value: f32 },
    /// Two anchor points of a joint axis coincide.
    DegenerateGeometry { joint: Joint },
    /// Node world transform cannot be inverted.
    SingularTransform(NodeId),
    /// Configuration could not be parsed.
    Config(toml::de::Error),
    /// Program could not be parsed.
    Program(serde_json::Error),
    /// Control command could not be parsed.
    InvalidCommand(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::Asset(e) => write!(f, "asset: {}", e),
            Error::InvalidAsset(reason) => write!(f, "invalid asset: {}", reason),
            Error::MissingNode(name) => write!(f, "asset has no node named '{}'", name),
            Error::InvalidDimension { name, value } => {
                write!(f, "dimension '{}' is not finite: {}", name, value)
            }
            Error::DegenerateGeometry { joint } => {
                write!(f, "axis of joint {} has zero length", joint)
            }
            Error::SingularTransform(node) => {
                write!(f, "world transform of node {} is singular", node)
            }
            Error::Config(e) => write!(f, "configuration: {}", e),
            Error::Program(e) => write!(f, "program: {}", e),
            Error::InvalidCommand(command) => write!(f, "invalid command: '{}'", command),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Asset(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Program(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<gltf::Error> for Error {
    fn from(value: gltf::Error) -> Self {
        Error::Asset(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Program(value)
    }
}

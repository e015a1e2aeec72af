pub mod joint;
pub mod math;

pub use joint::{Joint, JointCommand, RotationSense};
pub use nalgebra;

// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! The `ur3` library animates a kinematic skeleton of the UR3 arm next to its
//! imported mesh.
//!
//! The skeleton is a chain of line segments built from a handful of link
//! dimensions. Joint requests from the control surface are absolute angles;
//! the robot turns them into increments and rotates each link about its joint
//! pivot, carrying every downstream link along. The imported mesh joints are
//! set to the same angles so both stay in sync.
//!
//! The `scene` module holds the node arena, `pivot` the rotation about an
//! arbitrary point, and `robot` the skeleton, hitboxes and mesh bookkeeping.
//! The `runtime` module drives frames through a collision hook and a
//! renderer, fed by commands from the `control` module.

pub mod asset;
pub mod control;
pub mod pivot;
pub mod program;
pub mod robot;
pub mod runtime;
pub mod scene;

mod config;
mod error;

pub use self::config::*;
pub use self::error::Error;

pub use ur3_core as core;

pub type Result<T = ()> = std::result::Result<T, Error>;

/// UR3 runtime module containing various constants.
pub mod consts {
    use std::time::Duration;

    /// Runtime version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Default frame rate in frames per second.
    pub const DEFAULT_FRAME_RATE: u32 = 60;

    /// Queue size for control commands.
    pub const QUEUE_SIZE_COMMAND: usize = 16;

    /// Delay between program steps.
    pub const PROGRAM_STEP_INTERVAL: Duration = Duration::from_millis(500);
}

use std::time::Duration;

use crate::robot::HitboxVolume;

/// Collision detection hook, invoked once per frame.
pub trait CollisionDetector {
    /// Test the hitboxes for collisions.
    ///
    /// `elapsed` is the time since the previous frame. Returns the names of
    /// the hitboxes that are touched in this frame.
    fn calculate_collisions(
        &mut self,
        elapsed: Duration,
        hitboxes: &[HitboxVolume],
    ) -> Vec<&'static str>;
}

/// Detector that never reports a collision.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDetector;

impl CollisionDetector for NullDetector {
    fn calculate_collisions(
        &mut self,
        elapsed: Duration,
        hitboxes: &[HitboxVolume],
    ) -> Vec<&'static str> {
        log::trace!(
            "Collision pass over {} hitboxes after {:?}",
            hitboxes.len(),
            elapsed
        );

        Vec::new()
    }
}

//! Frame loop.
//!
//! The loop owns the robot. Control commands arrive over a channel and are
//! applied between frames, so the robot is only ever touched by the task that
//! runs the loop.

use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};

use crate::{control::ControlCommand, robot::Robot};

mod collision;
mod render;

pub use self::collision::{CollisionDetector, NullDetector};
pub use self::render::{RenderFrame, RenderItem, Renderer};

/// Frame context.
///
/// Tracks frame timing across the lifetime of the loop.
pub struct FrameContext {
    /// Loop start.
    start: Instant,
    /// Last tick.
    last_tick: Instant,
    /// Iteration count.
    iteration: u64,
}

impl FrameContext {
    /// Time since the previous frame.
    pub fn delta(&self) -> Duration {
        self.last_tick.elapsed()
    }

    /// Time since the loop started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Called after the frame is rendered.
    fn post_tick(&mut self) {
        self.last_tick = Instant::now();
        self.iteration += 1;
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        let now = Instant::now();

        Self {
            start: now,
            last_tick: now,
            iteration: 0,
        }
    }
}

pub struct FrameLoop<D: CollisionDetector, R: Renderer> {
    robot: Robot,
    detector: D,
    renderer: R,
    ctx: FrameContext,
}

impl<D: CollisionDetector, R: Renderer> FrameLoop<D, R> {
    pub fn new(robot: Robot, detector: D, renderer: R) -> Self {
        Self {
            robot,
            detector,
            renderer,
            ctx: FrameContext::default(),
        }
    }

    #[inline]
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    #[inline]
    pub fn robot_mut(&mut self) -> &mut Robot {
        &mut self.robot
    }

    #[inline]
    pub fn context(&self) -> &FrameContext {
        &self.ctx
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Apply a control command to the robot.
    pub fn dispatch(&mut self, command: &ControlCommand) -> crate::Result {
        log::debug!("{}", command);

        self.robot.handle(command)
    }

    /// Run a single frame: collision pass, then render.
    pub fn step(&mut self) {
        let volumes = self.robot.hitbox_volumes();
        let touched = self
            .detector
            .calculate_collisions(self.ctx.delta(), &volumes);

        if !touched.is_empty() {
            log::debug!("Hitboxes touched: {}", touched.join(", "));
        }
        self.robot.set_touched(touched);

        self.renderer.render(&self.robot.render_frame());

        self.ctx.post_tick();
    }

    /// Run frames on `interval` until shutdown or until the command channel
    /// closes.
    pub async fn run(
        &mut self,
        interval: Duration,
        mut commands: mpsc::Receiver<ControlCommand>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        log::debug!("Frame loop running every {:?}", interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.step();
                }
                command = commands.recv() => {
                    match command {
                        Some(command) => {
                            if let Err(e) = self.dispatch(&command) {
                                log::error!("Failed to apply command: {}", e);
                            }
                        }
                        None => {
                            log::debug!("Control channel closed");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    log::debug!("Frame loop received shutdown signal");
                    break;
                }
            }
        }

        log::debug!(
            "Frame loop stopped after {} frames in {:.1}s",
            self.ctx.iteration(),
            self.ctx.elapsed().as_secs_f32()
        );
    }
}

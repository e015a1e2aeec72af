use ur3::runtime::{RenderFrame, Renderer};

/// Frames between two summaries at debug level.
const SUMMARY_INTERVAL: u64 = 300;

/// Renderer that writes frames to the log.
#[derive(Default)]
pub struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        log::trace!("Frame {} with {} items", self.frames, frame.items.len());

        if self.frames % SUMMARY_INTERVAL == 0 {
            let visibility = frame.visibility;

            log::debug!(
                "Drawing {} items, hitboxes: {}, robot: {}, link chain: {}",
                frame.items.len(),
                visibility.hitboxes,
                visibility.robot,
                visibility.link_chain
            );
        }

        self.frames += 1;
    }
}

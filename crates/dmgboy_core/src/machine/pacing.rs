use std::time::{Duration, Instant};

use super::config::RunMode;
use crate::{CLOCK_HZ, TCYCLES_PER_FRAME};

/// Frames the pacer may fall behind before it gives up catching up.
const MAX_LAG_FRAMES: u32 = 4;

/// Wall-clock length of one DMG frame.
pub(crate) fn frame_duration() -> Duration {
    Duration::from_secs_f64(TCYCLES_PER_FRAME as f64 / CLOCK_HZ as f64)
}

/// Sleeps between frames in [`RunMode::Paced`]; a no-op otherwise.
pub(crate) struct FramePacer {
    mode: RunMode,
    frame: Duration,
    deadline: Instant,
}

impl FramePacer {
    pub(crate) fn new(mode: RunMode) -> Self {
        Self {
            mode,
            frame: frame_duration(),
            deadline: Instant::now(),
        }
    }

    /// Block until the current frame's time slot has passed.
    pub(crate) fn wait(&mut self) {
        if self.mode == RunMode::FreeRun {
            return;
        }

        self.deadline += self.frame;
        let now = Instant::now();
        if let Some(remaining) = self.deadline.checked_duration_since(now) {
            std::thread::sleep(remaining);
        } else if now.duration_since(self.deadline) > self.frame * MAX_LAG_FRAMES {
            self.deadline = now;
        }
    }
}

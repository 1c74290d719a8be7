use std::time::{Duration, Instant};

/// Paces frames at a fixed rate.
///
/// Frames that were missed (a slow draw, a suspended terminal) are dropped instead of
/// being replayed in a burst.
#[derive(Debug)]
pub(super) struct FrameClock {
    period: Duration,
    next_frame: Instant,
}

impl FrameClock {
    /// The first frame is due immediately. A zero rate is treated as one frame per second.
    pub(super) fn new(frame_rate: u32, now: Instant) -> Self {
        Self {
            period: Duration::from_secs(1) / frame_rate.max(1),
            next_frame: now,
        }
    }

    /// Consumes the current frame if it is due, scheduling the next one.
    pub(super) fn try_advance(&mut self, now: Instant) -> bool {
        if now < self.next_frame {
            return false;
        }
        self.next_frame += self.period;
        if self.next_frame <= now {
            self.next_frame = now + self.period;
        }
        true
    }

    /// How long input may be waited for before the next frame is due.
    pub(super) fn until_next_frame(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }
}

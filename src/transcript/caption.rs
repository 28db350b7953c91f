use crate::transcript::Side;
use std::time::Duration;

/// Quiet period after which a displayed caption clears.
pub const DEFAULT_CAPTION_TIMEOUT: Duration = Duration::from_millis(3000);

/// Countdown for one side's transient caption.
///
/// Each side owns its own timer; resetting one side never disturbs the
/// other. Cancellation works by generation: `reset` invalidates every token
/// handed out earlier, so a stale expiry is a no-op.
#[derive(Debug)]
pub struct CaptionTimer {
    duration: Duration,
    generation: u64,
}

impl CaptionTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            generation: 0,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Cancels any pending countdown and starts a new one. Returns the token
    /// a matching expiry must present.
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Cancels the pending countdown without starting a new one.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    /// True when `token` belongs to the countdown that is still pending.
    pub fn is_current(&self, token: u64) -> bool {
        token == self.generation
    }
}

/// Instruction to arm one side's caption countdown. Whoever runs the event
/// loop sleeps for `after` and then presents `token` back to the aggregator.
#[derive(Debug, Clone, Copy)]
pub struct CaptionReset {
    pub side: Side,
    pub token: u64,
    pub after: Duration,
}

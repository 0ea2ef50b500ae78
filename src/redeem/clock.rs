//! Wall-clock source for countdown timestamps

use chrono::Utc;

/// Source of epoch-millisecond timestamps
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wall clock that advances with tokio's clock
///
/// Anchored to a fixed epoch at creation; under `start_paused` tests it moves
/// exactly as far as the runtime auto-advances.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    epoch_ms: i64,
    started: tokio::time::Instant,
}

impl TokioClock {
    pub fn starting_at(epoch_ms: i64) -> Self {
        Self {
            epoch_ms,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        let elapsed = self.started.elapsed().as_millis() as i64;
        self.epoch_ms + elapsed
    }
}

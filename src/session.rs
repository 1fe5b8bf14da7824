use tracing::info;

/// Counts a fixed-length session down and ends it exactly once
#[derive(Debug, Clone)]
pub struct SessionTimer {
    pub start_ms: u64,
    pub duration_ms: u64,
    in_progress: bool,
}

impl SessionTimer {
    pub fn new(start_ms: u64, duration_ms: u64) -> Self {
        Self {
            start_ms,
            duration_ms,
            in_progress: true,
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Seconds left, rounded to one decimal and never below zero.
    ///
    /// The session is ended by this read once the rounded value hits zero.
    pub fn remaining_seconds(&mut self, now_ms: u64) -> f64 {
        let remaining_ms = self.duration_ms as f64 - self.elapsed_ms(now_ms) as f64;
        let secs = round_tenths(remaining_ms / 1000.0);
        if secs > 0.0 {
            return secs;
        }
        if self.in_progress {
            self.in_progress = false;
            info!(
                elapsed_ms = self.elapsed_ms(now_ms),
                "session time is up"
            );
        }
        0.0
    }
}

fn round_tenths(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

//! Time-based debounce gate for a logical input channel.

use std::time::{Duration, Instant};

/// Accepts a transition only if enough time has passed since the last
/// accepted one.
///
/// A fresh gate has never accepted anything, so its first check always
/// succeeds. Timestamps are expected to come from a monotonic clock; a
/// timestamp earlier than the last accepted one counts as zero elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceGate {
    threshold: Duration,
    last_accepted_at: Option<Instant>,
}

impl DebounceGate {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_accepted_at: None,
        }
    }

    pub fn from_millis(threshold_ms: u64) -> Self {
        Self::new(Duration::from_millis(threshold_ms))
    }

    /// Returns true and records `now` iff `now - last_accepted_at >= threshold`.
    /// A rejected check leaves the gate untouched.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        let ready = match self.last_accepted_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.threshold,
        };
        if ready {
            self.last_accepted_at = Some(now);
        }
        ready
    }

    /// Whether a check at `now` would be accepted, without recording it.
    pub fn is_ready(&self, now: Instant) -> bool {
        self.last_accepted_at
            .is_none_or(|last| now.saturating_duration_since(last) >= self.threshold)
    }

    #[inline]
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    #[inline]
    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }
}

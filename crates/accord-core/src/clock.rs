//! Wall-clock seam for message and event timestamps.
//!
//! Timestamps are always stamped by the engine, never client-supplied, so
//! the clock sits behind a trait and tests pin it.

use chrono::Utc;

/// Source of wall-clock milliseconds since the Unix epoch.
pub trait Clock {
    /// Current reading in milliseconds.
    fn now_ms(&self) -> u64;
}

/// System clock via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Negative only for pre-epoch system clocks; clamp rather than wrap.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Fixed-reading clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

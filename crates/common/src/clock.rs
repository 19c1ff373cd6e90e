//! Tick timing utilities for scheduler-driven playback.
//!
//! A scheduler (an animation-frame callback, a tokio interval, a test loop)
//! reports absolute timestamps. Playback clocks want elapsed time since the
//! previous tick. This module provides:
//! - Converting timestamps into per-tick deltas
//! - Gating ticks to a fixed rate

use std::time::Instant;

/// Converts absolute tick timestamps (milliseconds) into deltas.
///
/// The first tick only primes the timer and yields no delta, so time spent
/// before the scheduler started never counts as playback time.
#[derive(Debug, Clone, Default)]
pub struct TickTimer {
    last_timestamp_ms: Option<f64>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick and return the milliseconds elapsed since the previous one.
    ///
    /// Returns `None` on the first tick and for timestamps that run backwards.
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<f64> {
        let previous = self.last_timestamp_ms.replace(timestamp_ms)?;
        let delta = timestamp_ms - previous;
        if delta.is_finite() && delta >= 0.0 {
            Some(delta)
        } else {
            None
        }
    }

    /// Forget the previous tick; the next tick primes again.
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }
}

/// Monotonic millisecond timestamps anchored at creation, for feeding a
/// [`TickTimer`] from real time.
#[derive(Debug, Clone)]
pub struct MonotonicTimestamps {
    epoch: Instant,
}

impl MonotonicTimestamps {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Milliseconds since the epoch.
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

/// Frame rate controller for scheduler ticks.
#[derive(Debug)]
pub struct RateController {
    target_interval_ms: f64,
    last_tick_ms: Option<f64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ms: 1000.0 / target_hz.max(1) as f64,
            last_tick_ms: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ms: f64) -> bool {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(current_ms);
                true
            }
            Some(last) if current_ms >= last + self.target_interval_ms => {
                self.last_tick_ms = Some(current_ms);
                true
            }
            _ => false,
        }
    }

    /// Target interval in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.target_interval_ms
    }
}

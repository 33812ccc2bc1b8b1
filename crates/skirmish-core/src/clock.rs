//! Injectable simulation time.
//!
//! Every cooldown, phase deadline and movement stagger in the core is
//! computed against [`Clock::now_ms`] rather than an ambient wall-clock
//! call. Production uses [`SystemClock`]; tests use [`ManualClock`] and
//! advance time explicitly.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A monotonic millisecond clock.
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the clock's origin.
    fn now_ms(&self) -> u64;
}

/// Shared handle to a clock, threaded through every component that
/// schedules or checks a deadline.
pub type SharedClock = Arc<dyn Clock>;

/// Real time, anchored to the instant the clock was created.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock that only moves when told to. Starts at zero.
///
/// Interior mutability lets tests hold one `Arc<ManualClock>` and
/// advance it while the simulation holds the same clock as a
/// [`SharedClock`].
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }

    /// Jumps the clock to an absolute time.
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

//! Fixed-interval tick loop for tokio deployments.
//!
//! The engine itself is synchronous; this module is the thin scheduler
//! that invokes it. One driver per engine — rooms are ticked
//! sequentially inside a single [`GameEngine::tick`] call, so there is
//! no per-room task fan-out to coordinate.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::GameEngine;

/// The cadence production deployments tick at.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Ticks the shared engine at a fixed interval until every room has
/// ended and been removed.
///
/// Missed ticks are skipped rather than bursted — a stalled host should
/// not be followed by a catch-up storm of simulation ticks.
pub async fn run_until_idle(engine: Arc<Mutex<GameEngine>>, tick_interval: Duration) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tracing::debug!(interval_ms = tick_interval.as_millis() as u64, "tick driver started");

    loop {
        interval.tick().await;
        let mut engine = engine.lock().await;
        engine.tick();
        if engine.room_count() == 0 {
            break;
        }
    }

    tracing::debug!("tick driver stopped, no rooms remain");
}

//! SessionSweeper - background eviction of idle chat sessions.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `max_idle` | 30min | Idle time after which a session is dropped |
//! | `interval` | 5min | Time between sweeps |
//!
//! ## Graceful Shutdown
//!
//! Stops as soon as `true` is published on the `watch` channel or the
//! sender is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::ports::SessionStore;

pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Periodically evicts idle sessions from a `SessionStore`.
pub struct SessionSweeper {
    sessions: Arc<dyn SessionStore>,
    max_idle: Duration,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions,
            max_idle: DEFAULT_SESSION_IDLE_TTL,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_max_idle(mut self, max_idle: Duration) -> Self {
        self.max_idle = max_idle;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_idle_secs = self.max_idle.as_secs(),
            "Session sweeper started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Session sweeper stopped");
                        return;
                    }
                }
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Runs one sweep and returns the number of sessions evicted.
    pub async fn sweep_once(&self) -> usize {
        let evicted = self.sessions.evict_idle(self.max_idle).await;
        if evicted > 0 {
            let remaining = self.sessions.len().await;
            tracing::info!(evicted, remaining, "Evicted idle sessions");
        }
        evicted
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}

//! DescriptionRefresher - background reload of the organization description.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 3h | Time between reloads |
//!
//! ## Graceful Shutdown
//!
//! The task listens on a `watch` channel and stops as soon as `true` is
//! published. An in-flight reload is abandoned; the store keeps its last
//! published snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::description_store::DescriptionStore;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3 * 60 * 60);

/// Periodically reloads a `DescriptionStore`.
pub struct DescriptionRefresher {
    store: Arc<DescriptionStore>,
    interval: Duration,
}

impl DescriptionRefresher {
    pub fn new(store: Arc<DescriptionStore>) -> Self {
        Self {
            store,
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Runs until shutdown. The first reload happens one interval after start;
    /// the initial load belongs to startup.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            location = %self.store.location(),
            "Description refresher started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Description refresher stopped");
                        return;
                    }
                }
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
            }
        }
    }

    /// Runs one reload; failures are logged by the store and otherwise ignored.
    pub async fn refresh_once(&self) -> bool {
        self.store.load_with_retry().await.is_ok()
    }

    /// Spawns `run` on the runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }
}

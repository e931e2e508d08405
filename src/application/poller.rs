// Polling loop - timer-driven background worker producing render updates
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::feed_source::{FeedSource, FetchStats};
use crate::application::highlight_resolver::resolve_highlights;
use crate::domain::fleet::FleetSnapshot;
use crate::domain::highlight::HighlightSet;
use crate::domain::region::RegionRegistry;

/// Default seconds between polls.
pub const DEFAULT_INTERVAL_SECS: u64 = 3;

/// Full-state update handed to the foreground render loop. Each `Refresh`
/// replaces the previous one wholesale, so the consumer may drop
/// superseded updates in favor of the latest.
#[derive(Debug, Clone)]
pub enum RenderUpdate {
    Refresh {
        snapshot: Arc<FleetSnapshot>,
        highlights: HighlightSet,
        stats: Option<FetchStats>,
    },
    /// Transient one-line status, replaced on the next successful tick.
    Status(String),
}

/// Handle to a spawned poller: idempotent cancellation plus the join
/// barrier the shutdown path blocks on before terminal teardown.
pub struct PollerHandle {
    shutdown: CancellationToken,
    worker: JoinHandle<()>,
}

impl PollerHandle {
    /// Signals cancellation. Safe to call more than once.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Waits for the worker task to exit.
    pub async fn join(self) {
        if let Err(err) = self.worker.await {
            warn!(error = %err, "Poller task did not exit cleanly");
        }
    }
}

/// Background worker that periodically fetches a fleet snapshot, resolves
/// its highlights and publishes a render update.
///
/// Exactly one poller runs per dashboard session. Cancellation is observed
/// at two points per tick: before a fetch starts, and immediately after an
/// in-flight fetch completes (its result is then discarded).
pub struct CaravanPoller {
    feed: Arc<dyn FeedSource>,
    registry: &'static RegionRegistry,
    interval: Duration,
}

impl CaravanPoller {
    pub fn new(feed: Arc<dyn FeedSource>, registry: &'static RegionRegistry) -> Self {
        Self {
            feed,
            registry,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }

    /// Sets a custom polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawns the poller on the current runtime.
    pub fn spawn(self, updates: mpsc::Sender<RenderUpdate>) -> PollerHandle {
        let shutdown = CancellationToken::new();
        let worker = tokio::spawn(self.run(shutdown.clone(), updates));
        PollerHandle { shutdown, worker }
    }

    /// Runs the polling loop until `shutdown` is signalled. No update is
    /// sent after cancellation is observed.
    pub async fn run(self, shutdown: CancellationToken, updates: mpsc::Sender<RenderUpdate>) {
        info!(
            interval_secs = self.interval.as_secs_f64(),
            "Caravan poller starting"
        );

        let mut interval = tokio::time::interval(self.interval);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Caravan poller shutting down");
                    break;
                }

                _ = interval.tick() => {
                    let now = chrono::Utc::now().timestamp();
                    let fetched = self.feed.fetch(now).await;

                    // An in-flight fetch is allowed to finish, but its
                    // result is discarded once cancellation is observed.
                    if shutdown.is_cancelled() {
                        info!("Caravan poller shutting down, discarding in-flight fetch");
                        break;
                    }

                    let update = match fetched {
                        Ok(snapshot) => {
                            let highlights = resolve_highlights(&snapshot, self.registry);
                            debug!(
                                vehicles = snapshot.vehicles.len(),
                                highlighted = highlights.len(),
                                timestamp = %snapshot.timestamp,
                                "Fetched caravan snapshot"
                            );
                            RenderUpdate::Refresh {
                                snapshot: Arc::new(snapshot),
                                highlights,
                                stats: self.feed.last_fetch(),
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, "Caravan fetch failed, keeping previous snapshot");
                            RenderUpdate::Status(format!("Error fetching caravan info: {err}"))
                        }
                    };

                    if updates.send(update).await.is_err() {
                        debug!("Render side dropped the update channel, stopping poller");
                        break;
                    }
                }
            }
        }
    }
}

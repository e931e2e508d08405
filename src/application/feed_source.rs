// Feed source trait - seam between the poller and the HTTP transport
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::fleet::FleetSnapshot;

/// Errors from one fetch attempt. Both variants are recovered by the
/// polling loop (skip the tick, keep the previous snapshot) and are never
/// fatal to the dashboard.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("caravan feed unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("caravan feed returned an undecodable body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Status and latency of the most recent completed request. Recorded even
/// when the body fails to decode, so staleness stays observable.
#[derive(Debug, Clone, Copy)]
pub struct FetchStats {
    pub status: u16,
    pub latency: Duration,
}

/// Source of fleet snapshots.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches the current snapshot. `now_unix_secs` feeds the coarse
    /// time-bucket query parameter on the request URL.
    async fn fetch(&self, now_unix_secs: i64) -> Result<FleetSnapshot, FeedError>;

    /// Stats of the last completed request, if the source tracks them.
    fn last_fetch(&self) -> Option<FetchStats> {
        None
    }
}

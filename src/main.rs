// Main entry point - Dependency injection and dashboard startup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::tty::IsTty;
use tokio::sync::mpsc;

use crate::application::poller::CaravanPoller;
use crate::domain::AppContext;
use crate::infrastructure::config::load_caravan_config;
use crate::infrastructure::feed_client::CaravanFeedClient;
use crate::presentation::terminal::{run_dashboard, run_headless};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to stderr so the dashboard owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Configuration errors are the only fatal ones; everything in the
    // steady-state loop recovers on the next tick.
    let config = load_caravan_config().context("loading caravan configuration")?;
    let context = AppContext::bootstrap();

    let feed = Arc::new(CaravanFeedClient::new(config.feed.url.clone()));
    let poller = CaravanPoller::new(feed, context.registry)
        .with_interval(Duration::from_secs(config.feed.interval_secs));

    let (updates_tx, updates_rx) = mpsc::channel(16);
    let handle = poller.spawn(updates_tx);

    if std::io::stdout().is_tty() {
        run_dashboard(context, updates_rx, handle, config.feed.show_refresh_hint).await
    } else {
        run_headless(context, updates_rx, handle).await
    }
}

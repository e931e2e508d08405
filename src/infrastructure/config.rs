// Configuration loading for the caravan dashboard
use anyhow::Context;
use serde::Deserialize;

/// Published location of the caravan feed.
pub const DEFAULT_FEED_URL: &str =
    "https://storage.googleapis.com/pple-media/election-2569/caravan.json";

const DEFAULT_INTERVAL_SECS: u64 = 3;

#[derive(Debug, Deserialize, Clone)]
pub struct CaravanConfig {
    pub feed: FeedSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    pub url: String,
    pub interval_secs: u64,
    pub show_refresh_hint: bool,
}

/// Loads configuration from `config/caravan.toml` with compiled defaults
/// and `CARAVAN__FEED__*` environment overrides. A malformed file or an
/// unparseable feed URL is fatal at startup; steady-state fetch errors are
/// handled by the polling loop instead.
pub fn load_caravan_config() -> anyhow::Result<CaravanConfig> {
    let settings = config::Config::builder()
        .set_default("feed.url", DEFAULT_FEED_URL)?
        .set_default("feed.interval_secs", DEFAULT_INTERVAL_SECS)?
        .set_default("feed.show_refresh_hint", true)?
        .add_source(config::File::with_name("config/caravan").required(false))
        .add_source(config::Environment::with_prefix("CARAVAN").separator("__"))
        .build()?;

    let config: CaravanConfig = settings.try_deserialize()?;
    reqwest::Url::parse(&config.feed.url)
        .with_context(|| format!("invalid caravan feed url: {}", config.feed.url))?;
    Ok(config)
}

// Caravan feed client - HTTP fetch and wire-to-domain mapping
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::application::feed_source::{FeedError, FeedSource, FetchStats};
use crate::domain::fleet::{vehicle_display_name, EngineStatus, FleetSnapshot, Vehicle};

/// Upper bound on a single feed request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the caravan JSON feed.
///
/// Performs a single GET per call with a coarse time-bucket query
/// parameter; retry policy belongs to the polling loop.
pub struct CaravanFeedClient {
    base_url: String,
    client: reqwest::Client,
    last_fetch: Mutex<Option<FetchStats>>,
}

impl CaravanFeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            last_fetch: Mutex::new(None),
        }
    }

    /// Request URL with the `t=<unix_seconds/10>` cache-busting bucket.
    fn bucketed_url(&self, now_unix_secs: i64) -> String {
        format!("{}?t={}", self.base_url, now_unix_secs.div_euclid(10))
    }
}

#[async_trait]
impl FeedSource for CaravanFeedClient {
    async fn fetch(&self, now_unix_secs: i64) -> Result<FleetSnapshot, FeedError> {
        let url = self.bucketed_url(now_unix_secs);
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .timeout(FETCH_TIMEOUT)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let latency = started.elapsed();

        *self.last_fetch.lock().unwrap() = Some(FetchStats { status, latency });

        decode_snapshot(status, &body)
    }

    fn last_fetch(&self) -> Option<FetchStats> {
        *self.last_fetch.lock().unwrap()
    }
}

/// Decodes a feed body into a domain snapshot.
pub(crate) fn decode_snapshot(status: u16, body: &str) -> Result<FleetSnapshot, FeedError> {
    let wire: CaravanResponse =
        serde_json::from_str(body).map_err(|source| FeedError::Decode { status, source })?;
    debug!(
        count = wire.count,
        filtered = wire.filtered,
        total = wire.total,
        "Decoded caravan feed response"
    );
    Ok(wire.into_snapshot())
}

#[derive(Debug, Deserialize)]
struct CaravanResponse {
    #[serde(default)]
    data: Vec<VehicleRecord>,
    #[serde(default)]
    count: i64,
    #[serde(default)]
    filtered: i64,
    #[serde(default)]
    total: i64,
    #[serde(default)]
    timestamp: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VehicleRecord {
    #[serde(rename = "gpsID")]
    gps_id: String,
    #[serde(rename = "plateNumber")]
    plate_number: String,
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "GPS")]
    gps: String,
    #[serde(rename = "GPRS")]
    gprs: String,
    #[serde(rename = "Engine")]
    engine: String,
    #[serde(rename = "Speed")]
    speed: i32,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "addressT")]
    address_t: String,
    #[serde(rename = "externalBatt")]
    external_batt: String,
}

impl CaravanResponse {
    fn into_snapshot(self) -> FleetSnapshot {
        FleetSnapshot {
            timestamp: self.timestamp,
            vehicles: self.data.into_iter().map(VehicleRecord::into_vehicle).collect(),
        }
    }
}

impl VehicleRecord {
    fn into_vehicle(self) -> Vehicle {
        let display_name = vehicle_display_name(&self.gps_id)
            .map(str::to_string)
            .unwrap_or_else(|| self.plate_number.clone());
        Vehicle {
            display_name,
            gps_id: self.gps_id,
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            engine: EngineStatus::from_feed(&self.engine),
            address: self.address_t,
            external_batt: self.external_batt,
            gps_signal: self.gps,
            gprs_signal: self.gprs,
            last_update: self.date_time,
        }
    }
}

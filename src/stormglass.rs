//! # Stormglass Point-Forecast Fetching
//!
//! Network collaborator for the report core. Two endpoints are consumed:
//!
//! - **Weather**: `/v2/weather/point`, hourly multi-source metric readings
//!   for the requested window; the response must carry an `hours` array.
//! - **Tide extremes**: two endpoint variants exist in the wild, so the
//!   fetch tries `/v2/tide/extremes/point` first and falls back to
//!   `/v2/tide/extremes`, reporting the last failure if both fail. This is
//!   the only retry behavior anywhere in the system.
//!
//! Authentication is a raw API key in the `Authorization` header. All
//! responses are decoded as JSON objects; a success response missing the
//! expected array structure is an API error, not a data gap.

use crate::normalize::METRIC_PARAMS;
use crate::{RawHour, RawTideEvent, SurfError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Weather point-forecast endpoint.
pub const WEATHER_ENDPOINT: &str = "https://api.stormglass.io/v2/weather/point";

/// Tide extremes endpoints, tried in order.
pub const TIDE_ENDPOINTS: [&str; 2] = [
    "https://api.stormglass.io/v2/tide/extremes/point",
    "https://api.stormglass.io/v2/tide/extremes",
];

/// Thin Stormglass client: one `reqwest::Client` with a per-request
/// timeout, plus the API key applied to every call.
pub struct StormglassClient {
    client: reqwest::Client,
    api_key: String,
}

impl StormglassClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Result<Self, SurfError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Fetch raw forecast hours for `[start, end]`.
    ///
    /// `sources` narrows the upstream models server-side when non-empty;
    /// the same list drives metric resolution client-side later. Start and
    /// end travel as unix seconds.
    pub async fn fetch_weather_hours(
        &self,
        lat: f64,
        lon: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sources: &[String],
    ) -> Result<Vec<RawHour>, SurfError> {
        let mut query: Vec<(&str, String)> = vec![
            ("lat", lat.to_string()),
            ("lng", lon.to_string()),
            ("params", METRIC_PARAMS.join(",")),
            ("start", start.timestamp().to_string()),
            ("end", end.timestamp().to_string()),
        ];
        if !sources.is_empty() {
            query.push(("source", sources.join(",")));
        }

        let payload = self.get_json(WEATHER_ENDPOINT, &query).await?;
        let hours = payload
            .get("hours")
            .and_then(Value::as_array)
            .ok_or_else(|| SurfError::Api("weather response missing hours array".to_string()))?;
        debug!(count = hours.len(), "fetched weather hours");
        Ok(hours
            .iter()
            .filter_map(|hour| hour.as_object().cloned())
            .collect())
    }

    /// Fetch raw tide extremes for `[start, end]` (date precision).
    ///
    /// Tries each endpoint in [`TIDE_ENDPOINTS`] order; a response missing
    /// the `data` array counts as a failure of that endpoint. If every
    /// endpoint fails, the last failure is reported.
    pub async fn fetch_tide_extremes(
        &self,
        lat: f64,
        lon: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawTideEvent>, SurfError> {
        let query: Vec<(&str, String)> = vec![
            ("lat", lat.to_string()),
            ("lng", lon.to_string()),
            ("start", start.date_naive().to_string()),
            ("end", end.date_naive().to_string()),
        ];

        let mut last_error: Option<SurfError> = None;
        for endpoint in TIDE_ENDPOINTS {
            let attempt = self.get_json(endpoint, &query).await.and_then(|payload| {
                payload
                    .get("data")
                    .and_then(Value::as_array)
                    .cloned()
                    .ok_or_else(|| SurfError::Api("tide response missing data array".to_string()))
            });
            match attempt {
                Ok(data) => {
                    debug!(endpoint, count = data.len(), "fetched tide extremes");
                    return Ok(data
                        .iter()
                        .filter_map(|event| event.as_object().cloned())
                        .collect());
                }
                Err(error) => {
                    warn!(endpoint, %error, "tide endpoint failed");
                    last_error = Some(error);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| SurfError::Api("no tide endpoint produced data".to_string())))
    }

    /// GET a URL and decode the body as a JSON object. Non-2xx statuses
    /// carry the body in the error for diagnosis.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, SurfError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", &self.api_key)
            .query(query)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SurfError::Api(format!("HTTP {status} for {url}: {body}")));
        }
        let parsed: Value = serde_json::from_str(&body)
            .map_err(|error| SurfError::Api(format!("invalid JSON from {url}: {error}")))?;
        if !parsed.is_object() {
            return Err(SurfError::Api(format!(
                "unexpected payload from {url}; expected JSON object"
            )));
        }
        Ok(parsed)
    }
}

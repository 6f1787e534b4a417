//! # Surf Report Core Library
//!
//! This library implements the data-reconciliation and scoring engine behind
//! the `surf-report` CLI. It turns raw Stormglass point-forecast payloads into
//! a stable, fully-populated report: one normalized "now" observation, scored
//! best-hour windows for each forecast horizon, and tide-state signals
//! (trend at the anchor instant plus day-bucketed high/low groupings).
//!
//! ## Design Philosophy
//!
//! ### Deterministic reconciliation
//! Stormglass returns most metrics as a mapping of numerical-model name to
//! value (`{"sg": 1.4, "icon": 1.5, ...}`). The library resolves each metric
//! to a single number with a fixed, caller-extensible priority order so that
//! repeated runs over the same payload always agree. See [`resolve`].
//!
//! ### Stable output shape
//! Every [`NormalizedHour`] carries exactly the eight canonical metric keys.
//! A metric the upstream models did not report serializes as JSON `null`,
//! never by omitting the key, so downstream consumers (cron jobs, dashboards,
//! other agents) can index the payload without existence checks.
//!
//! ### Pure core, thin edges
//! Everything in [`resolve`], [`normalize`], [`score`], [`tides`] and
//! [`report`] is a pure function over in-memory values. Network fetch lives
//! in [`stormglass`] and [`geocode`]; presentation lives in [`renderer`].
//! Each invocation builds fresh values, so callers may run one report per
//! spot in parallel without synchronization.
//!
//! ## Data Flow
//! 1. **Fetch**: weather hours + tide extremes from Stormglass (or the
//!    deterministic [`fallback`] generator in mock mode)
//! 2. **Normalize**: per-hour multi-source metric selection
//! 3. **Score**: best-hour windows over 24h/48h/72h horizons
//! 4. **Tides**: extremum normalization, trend-now, day grouping
//! 5. **Assemble**: one immutable [`Report`] per invocation

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// Module declarations
pub mod config;
pub mod fallback;
pub mod geocode;
pub mod normalize;
pub mod renderer;
pub mod report;
pub mod resolve;
pub mod score;
pub mod stormglass;
pub mod tides;

/// A raw per-hour forecast record as received from the weather endpoint:
/// a `time` entry plus one entry per upstream metric name, each either a
/// bare number or a mapping of model source to number.
///
/// Kept as an order-preserving JSON map because the metric resolver's
/// last-resort rule scans values in upstream insertion order.
pub type RawHour = serde_json::Map<String, serde_json::Value>;

/// A raw tide extremum event as received from the tide endpoints
/// (`time`, `type`, `height`, all optional and untrusted).
pub type RawTideEvent = serde_json::Map<String, serde_json::Value>;

/// Errors surfaced by report generation.
///
/// The taxonomy mirrors the CLI exit-code contract: configuration problems
/// are reported before any network call, API failures propagate unchanged,
/// and a `DataGap` means the upstream succeeded but left nothing usable.
/// Individual malformed records (a tide event without a time, a non-numeric
/// metric entry) are skipped locally and never raise.
#[derive(Error, Debug)]
pub enum SurfError {
    /// Required credential or location input missing; never retried.
    #[error("missing configuration: {0}")]
    Config(String),

    /// Non-2xx response, unparseable payload, or expected structure absent.
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream succeeded but yielded zero usable time-stamped records.
    #[error("no usable data: {0}")]
    DataGap(String),

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O failure (runtime construction, config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Requested forward time span for forecasting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizon {
    /// Degenerate horizon: nearest hour only, no forecast windows.
    #[serde(rename = "now")]
    Now,
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "48h")]
    H48,
    #[serde(rename = "72h")]
    H72,
}

impl Horizon {
    /// Hours of forecast data fetched for this horizon. The `now` horizon
    /// still pulls a single hour so the nearest-hour observation exists.
    pub fn hours(self) -> i64 {
        match self {
            Horizon::Now => 1,
            Horizon::H24 => 24,
            Horizon::H48 => 48,
            Horizon::H72 => 72,
        }
    }

    /// Wire label, also used as the windows-mapping key.
    pub fn label(self) -> &'static str {
        match self {
            Horizon::Now => "now",
            Horizon::H24 => "24h",
            Horizon::H48 => "48h",
            Horizon::H72 => "72h",
        }
    }
}

impl std::str::FromStr for Horizon {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "now" => Ok(Horizon::Now),
            "24h" => Ok(Horizon::H24),
            "48h" => Ok(Horizon::H48),
            "72h" => Ok(Horizon::H72),
            other => Err(format!(
                "invalid horizon {other:?} (expected now, 24h, 48h or 72h)"
            )),
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One canonical forecast hour.
///
/// The `time` string is carried verbatim from the upstream payload (no
/// reformatting); every metric field is always present and holds `None`
/// when no model reported a usable value. Units are encoded in the wire
/// names: metres, seconds, degrees, metres per second, Celsius.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedHour {
    pub time: String,
    pub wave_height_m: Option<f64>,
    pub swell_height_m: Option<f64>,
    pub swell_period_s: Option<f64>,
    pub swell_direction_deg: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub water_temperature_c: Option<f64>,
}

/// A normalized hour plus its derived surf-quality score.
/// Recomputed on every invocation, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredHour {
    #[serde(flatten)]
    pub hour: NormalizedHour,
    pub score: f64,
}

/// One forecast window: fixed start/end instants (independent of which
/// hours actually had data) and up to three best hours by score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastWindow {
    pub start: String,
    pub end: String,
    pub best_hours: Vec<ScoredHour>,
}

/// A tide high/low event. `kind` is passed through from the provider
/// unchanged (trend inference lower-cases its own copy); a missing or
/// non-numeric height becomes `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TideExtreme {
    pub time: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub height_m: Option<f64>,
}

/// Tide state at the anchor instant, derived from the nearest preceding
/// and following extremes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideTrend {
    Rising,
    Falling,
    Unknown,
}

impl std::fmt::Display for TideTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TideTrend::Rising => "rising",
            TideTrend::Falling => "falling",
            TideTrend::Unknown => "unknown",
        })
    }
}

/// Time + height of an extreme inside a day bucket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TidePoint {
    pub time: String,
    pub height_m: Option<f64>,
}

/// High/low extremes of a single UTC calendar day, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DayTides {
    pub high: Vec<TidePoint>,
    pub low: Vec<TidePoint>,
}

/// How the report's coordinates were obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Location,
    Coordinates,
}

/// Resolved geographic point the report was generated for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    pub query: Option<String>,
    pub resolved_name: String,
    pub lat: f64,
    pub lon: f64,
    pub google_place_id: Option<String>,
}

/// Report provenance block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub generated_at: String,
    pub horizon: Horizon,
    pub input_mode: InputMode,
    pub sources_requested: Vec<String>,
    pub warnings: Vec<String>,
}

/// Forecast block: windows keyed by horizon label ("24h", "48h", "72h").
/// Only horizons not exceeding the requested one are present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub windows: BTreeMap<String, ForecastWindow>,
}

/// Tide block: trend at the anchor, flat extremes list, and per-day
/// high/low groupings keyed by ISO date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TideReport {
    pub trend_now: TideTrend,
    pub extremes: Vec<TideExtreme>,
    pub by_day: BTreeMap<String, DayTides>,
}

/// The root aggregate emitted once per invocation.
///
/// The serialized field names and nesting are the wire contract for
/// downstream consumers; the shape never changes with data availability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub meta: Meta,
    pub location: LocationInfo,
    pub now: NormalizedHour,
    pub forecast: Forecast,
    pub tides: TideReport,
}

/// Current instant truncated to whole seconds, so `generatedAt` and the
/// window bounds render without a fractional component.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Parse an upstream timestamp (RFC 3339, trailing `Z` or explicit offset)
/// into UTC. Returns `None` for anything unparseable; callers treat such
/// records as malformed and skip them rather than aborting.
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render an instant in the report's canonical `...Z` form.
pub fn iso_z(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

//! # Deterministic Offline Mock Data
//!
//! Mock mode exists so cron jobs, integration tests, and downstream agents
//! can exercise the full report pipeline without credentials or network
//! access. The generator produces a plausible swell pattern from simple
//! sine/cosine curves and an alternating high/low tide sequence, then runs
//! it through the same assembly path as live data, so the output shape is
//! identical byte-for-byte in structure.
//!
//! Given the same anchor instant, the output is fully deterministic.

use crate::report::{assemble, ReportContext};
use crate::{iso_z, Horizon, InputMode, LocationInfo, RawHour, RawTideEvent, Report, SurfError};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Synthetic forecast hours starting at the anchor. The `now` horizon
/// still gets a 24 hour span so nearest-hour selection has context.
pub fn mock_hours(anchor: DateTime<Utc>, horizon: Horizon) -> Vec<RawHour> {
    let span = match horizon {
        Horizon::Now => 24,
        other => other.hours(),
    };
    (0..=span)
        .map(|i| {
            let t = anchor + Duration::hours(i);
            let x = i as f64;
            json!({
                "time": iso_z(t),
                "waveHeight": round2(0.9 + 0.5 * (x / 6.0).sin()),
                "swellHeight": round2(0.7 + 0.3 * (x / 7.0).cos()),
                "swellPeriod": round2(8.0 + 2.0 * (x / 8.0).sin()),
                "swellDirection": round1(240.0 + 15.0 * (x / 12.0).cos()),
                "windSpeed": round2(4.0 + 2.0 * (x / 5.0).sin()),
                "windDirection": round1(210.0 + 25.0 * (x / 9.0).cos()),
                "gust": round2(6.0 + 2.5 * (x / 5.0).sin()),
                "waterTemperature": round2(10.5 + 0.8 * (x / 24.0).sin()),
            })
            .as_object()
            .expect("mock hour literal is an object")
            .clone()
        })
        .collect()
}

/// Synthetic tide extremes: one event every six hours, alternating high
/// and low, starting with a high at the anchor.
pub fn mock_extremes(anchor: DateTime<Utc>, horizon: Horizon) -> Vec<RawTideEvent> {
    let count = (horizon.hours() / 6 + 2).max(6);
    let mut kind = "low";
    (0..count)
        .map(|i| {
            let t = anchor + Duration::hours(i * 6);
            kind = if kind == "low" { "high" } else { "low" };
            let height = if kind == "high" { 1.8 } else { 0.7 };
            json!({ "time": iso_z(t), "type": kind, "height": height })
                .as_object()
                .expect("mock extreme literal is an object")
                .clone()
        })
        .collect()
}

/// Build a complete mock report through the regular assembly path.
pub fn mock_report(
    anchor: DateTime<Utc>,
    horizon: Horizon,
    input_mode: InputMode,
    lat: f64,
    lon: f64,
    query: Option<String>,
) -> Result<Report, SurfError> {
    let hours = mock_hours(anchor, horizon);
    let extremes = mock_extremes(anchor, horizon);
    let resolved_name = query
        .clone()
        .unwrap_or_else(|| format!("{lat},{lon}"));
    let context = ReportContext {
        input_mode,
        sources: vec![],
        warnings: vec!["Mock mode enabled: no external API calls were made.".to_string()],
        location: LocationInfo {
            query,
            resolved_name,
            lat,
            lon,
            google_place_id: None,
        },
    };
    assemble(&hours, &extremes, anchor, horizon, context)
}

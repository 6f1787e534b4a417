//! # Hour Normalization
//!
//! Applies the metric resolver across the fixed metric set of one raw
//! forecast hour, producing a [`NormalizedHour`] with every canonical field
//! present (as `None` when nothing usable was reported). Also hosts the
//! nearest-hour selection used to pick the "now" observation.

use crate::resolve::resolve;
use crate::{parse_time, NormalizedHour, RawHour, SurfError};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Upstream metric names requested from the weather endpoint, in canonical
/// field order. The wire mapping is upstream name + unit suffix:
/// `waveHeight` becomes `waveHeightM`, `gust` becomes `windGustMps`,
/// `waterTemperature` becomes `waterTemperatureC`, and so on.
pub const METRIC_PARAMS: [&str; 8] = [
    "waveHeight",
    "swellHeight",
    "swellPeriod",
    "swellDirection",
    "windSpeed",
    "windDirection",
    "gust",
    "waterTemperature",
];

/// Normalize one raw hour. The `time` value is copied verbatim; each metric
/// goes through [`resolve`] with the caller's source preference. Hours
/// without a `time` entry are filtered out by the assembler, not here.
pub fn normalize_hour(raw: &RawHour, preferred: &[String]) -> NormalizedHour {
    NormalizedHour {
        time: raw
            .get("time")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        wave_height_m: resolve(raw.get("waveHeight"), preferred),
        swell_height_m: resolve(raw.get("swellHeight"), preferred),
        swell_period_s: resolve(raw.get("swellPeriod"), preferred),
        swell_direction_deg: resolve(raw.get("swellDirection"), preferred),
        wind_speed_mps: resolve(raw.get("windSpeed"), preferred),
        wind_direction_deg: resolve(raw.get("windDirection"), preferred),
        wind_gust_mps: resolve(raw.get("gust"), preferred),
        water_temperature_c: resolve(raw.get("waterTemperature"), preferred),
    }
}

/// Seconds between an hour's timestamp and the anchor. Hours whose time
/// does not parse rank at infinite distance so they can never be "now".
fn distance_secs(hour: &NormalizedHour, anchor: DateTime<Utc>) -> f64 {
    match parse_time(&hour.time) {
        Some(t) => (t - anchor).num_seconds().abs() as f64,
        None => f64::INFINITY,
    }
}

/// Pick the observation nearest to the anchor instant.
///
/// Equal distances keep the first element in input order. An empty input
/// is a hard `DataGap`: report assembly must not fabricate a "now".
pub fn nearest_hour<'a>(
    hours: &'a [NormalizedHour],
    anchor: DateTime<Utc>,
) -> Result<&'a NormalizedHour, SurfError> {
    let mut iter = hours.iter();
    let first = iter
        .next()
        .ok_or_else(|| SurfError::DataGap("no weather hours with time field".to_string()))?;

    let mut best = first;
    let mut best_distance = distance_secs(first, anchor);
    for hour in iter {
        let distance = distance_secs(hour, anchor);
        if distance < best_distance {
            best = hour;
            best_distance = distance;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw_hour(value: serde_json::Value) -> RawHour {
        value.as_object().expect("test hour is an object").clone()
    }

    fn hour_at(time: &str) -> NormalizedHour {
        normalize_hour(&raw_hour(json!({ "time": time })), &[])
    }

    #[test]
    fn all_eight_metric_fields_are_populated() {
        let raw = raw_hour(json!({
            "time": "2026-08-23T06:00:00+00:00",
            "waveHeight": {"sg": 1.4, "icon": 1.2},
            "swellHeight": {"sg": 0.9},
            "swellPeriod": {"icon": 11.0},
            "swellDirection": {"sg": 241.0},
            "windSpeed": 5.5,
            "windDirection": {"sg": 210.0},
            "gust": {"sg": 7.25},
            "waterTemperature": {"sg": 17.1}
        }));
        let hour = normalize_hour(&raw, &[]);
        assert_eq!(hour.time, "2026-08-23T06:00:00+00:00");
        assert_eq!(hour.wave_height_m, Some(1.4));
        assert_eq!(hour.swell_height_m, Some(0.9));
        assert_eq!(hour.swell_period_s, Some(11.0));
        assert_eq!(hour.swell_direction_deg, Some(241.0));
        assert_eq!(hour.wind_speed_mps, Some(5.5));
        assert_eq!(hour.wind_direction_deg, Some(210.0));
        assert_eq!(hour.wind_gust_mps, Some(7.25));
        assert_eq!(hour.water_temperature_c, Some(17.1));
    }

    #[test]
    fn missing_metrics_normalize_to_unknown_not_zero() {
        let hour = hour_at("2026-08-23T06:00:00Z");
        assert_eq!(hour.wave_height_m, None);
        assert_eq!(hour.wind_gust_mps, None);
    }

    #[test]
    fn preference_order_reaches_every_metric() {
        let raw = raw_hour(json!({
            "time": "2026-08-23T06:00:00Z",
            "windSpeed": {"icon": 3.0, "gfs": 6.0}
        }));
        let hour = normalize_hour(&raw, &["gfs".to_string()]);
        assert_eq!(hour.wind_speed_mps, Some(6.0));
    }

    #[test]
    fn nearest_hour_minimizes_absolute_distance() {
        let anchor = Utc.with_ymd_and_hms(2026, 8, 23, 6, 20, 0).unwrap();
        let hours = vec![
            hour_at("2026-08-23T05:00:00Z"),
            hour_at("2026-08-23T06:00:00Z"),
            hour_at("2026-08-23T07:00:00Z"),
        ];
        let nearest = nearest_hour(&hours, anchor).unwrap();
        assert_eq!(nearest.time, "2026-08-23T06:00:00Z");
    }

    #[test]
    fn equal_distance_tie_keeps_first_in_input_order() {
        let anchor = Utc.with_ymd_and_hms(2026, 8, 23, 6, 30, 0).unwrap();
        let hours = vec![
            hour_at("2026-08-23T06:00:00Z"),
            hour_at("2026-08-23T07:00:00Z"),
        ];
        let nearest = nearest_hour(&hours, anchor).unwrap();
        assert_eq!(nearest.time, "2026-08-23T06:00:00Z");
    }

    #[test]
    fn empty_input_is_a_data_gap() {
        let anchor = Utc.with_ymd_and_hms(2026, 8, 23, 6, 0, 0).unwrap();
        let err = nearest_hour(&[], anchor).unwrap_err();
        assert!(matches!(err, SurfError::DataGap(_)));
    }

    #[test]
    fn unparseable_times_never_win_over_parseable_ones() {
        let anchor = Utc.with_ymd_and_hms(2026, 8, 23, 6, 0, 0).unwrap();
        let hours = vec![hour_at("not-a-time"), hour_at("2026-08-23T23:00:00Z")];
        let nearest = nearest_hour(&hours, anchor).unwrap();
        assert_eq!(nearest.time, "2026-08-23T23:00:00Z");
    }
}

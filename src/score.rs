//! # Surf-Quality Scoring and Window Construction
//!
//! The score is an additive desirability measure over one normalized hour:
//! chest-high waves around 1.2 m are ideal, long swell period is rewarded
//! up to a cap, calm wind and gusts are rewarded down to zero. A missing
//! metric contributes nothing but never disqualifies the hour, so sparse
//! upstream data still ranks.
//!
//! Window construction then keeps the top three hours per candidate horizon
//! (24h/48h/72h), with ties broken chronologically.

use crate::{iso_z, parse_time, ForecastWindow, Horizon, NormalizedHour, ScoredHour};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Candidate window lengths, label-first. A window is only built when its
/// length does not exceed the requested horizon.
const WINDOW_LENGTHS: [(&str, i64); 3] = [("24h", 24), ("48h", 48), ("72h", 72)];

/// Score one hour. Pure and deterministic; the result is finite,
/// non-negative, and rounded to 4 decimal places.
pub fn score_hour(hour: &NormalizedHour) -> f64 {
    let mut score = 0.0;
    if let Some(wave) = hour.wave_height_m {
        // Peak desirability at 1.2 m, fading linearly to zero either side.
        score += (1.2 - (wave - 1.2).abs()).max(0.0);
    }
    if let Some(period) = hour.swell_period_s {
        score += (period / 6.0).min(2.0);
    }
    if let Some(wind) = hour.wind_speed_mps {
        score += (2.0 - wind / 3.0).max(0.0);
    }
    if let Some(gust) = hour.wind_gust_mps {
        score += (1.5 - gust / 4.0).max(0.0);
    }
    (score * 10_000.0).round() / 10_000.0
}

/// Build the scored forecast windows for the requested horizon.
///
/// The degenerate `now` horizon produces an empty mapping. Each built
/// window records `[anchor, anchor + length]` as its bounds regardless of
/// which hours actually had data, selects the hours inside those bounds
/// (inclusive), and keeps the top three by descending score. The sort is
/// stable, so equal scores stay in chronological input order.
pub fn build_windows(
    hours: &[NormalizedHour],
    anchor: DateTime<Utc>,
    horizon: Horizon,
) -> BTreeMap<String, ForecastWindow> {
    let mut windows = BTreeMap::new();
    for (label, length) in WINDOW_LENGTHS {
        if horizon == Horizon::Now || length > horizon.hours() {
            continue;
        }
        let end = anchor + Duration::hours(length);
        let mut in_window: Vec<ScoredHour> = hours
            .iter()
            .filter_map(|hour| {
                let t = parse_time(&hour.time)?;
                if anchor <= t && t <= end {
                    Some(ScoredHour {
                        score: score_hour(hour),
                        hour: hour.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();
        in_window.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        in_window.truncate(3);
        windows.insert(
            label.to_string(),
            ForecastWindow {
                start: iso_z(anchor),
                end: iso_z(end),
                best_hours: in_window,
            },
        );
    }
    windows
}

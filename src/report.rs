//! # Report Assembly
//!
//! The orchestrator over the pure core: filters and normalizes the raw
//! weather hours, picks the "now" observation, builds the scored windows,
//! analyzes the tide extremes, and merges everything with the caller's
//! provenance into one immutable [`Report`]. Assembly either fully
//! succeeds or fails; no partial reports are ever emitted.

use crate::normalize::{nearest_hour, normalize_hour};
use crate::score::build_windows;
use crate::tides::{group_by_day, normalize_extremes, trend_at};
use crate::{
    iso_z, Forecast, Horizon, InputMode, LocationInfo, Meta, RawHour, RawTideEvent, Report,
    SurfError, TideReport,
};
use chrono::{DateTime, Utc};

/// Caller-supplied provenance for one assembly: how the coordinates were
/// obtained, which sources were requested, and any warnings collected on
/// the way (geocoder fallback, mock mode, multiple matches).
#[derive(Clone, Debug)]
pub struct ReportContext {
    pub input_mode: InputMode,
    pub sources: Vec<String>,
    pub warnings: Vec<String>,
    pub location: LocationInfo,
}

/// Assemble the report for one anchor instant.
///
/// Hours lacking a `time` entry are filtered out before normalization; if
/// none survive, assembly fails with a `DataGap` rather than degrading to
/// an empty report. Upstream failures from the fetch collaborators are
/// expected to propagate unchanged before this function is ever called.
pub fn assemble(
    raw_hours: &[RawHour],
    raw_tides: &[RawTideEvent],
    anchor: DateTime<Utc>,
    horizon: Horizon,
    context: ReportContext,
) -> Result<Report, SurfError> {
    let normalized: Vec<_> = raw_hours
        .iter()
        .filter(|hour| hour.contains_key("time"))
        .map(|hour| normalize_hour(hour, &context.sources))
        .collect();
    if normalized.is_empty() {
        return Err(SurfError::DataGap("no weather data points returned".to_string()));
    }

    let now = nearest_hour(&normalized, anchor)?.clone();
    let windows = build_windows(&normalized, anchor, horizon);

    let extremes = normalize_extremes(raw_tides);
    let trend_now = trend_at(&extremes, anchor);
    let by_day = group_by_day(&extremes);

    Ok(Report {
        meta: Meta {
            generated_at: iso_z(anchor),
            horizon,
            input_mode: context.input_mode,
            sources_requested: context.sources,
            warnings: context.warnings,
        },
        location: context.location,
        now,
        forecast: Forecast { windows },
        tides: TideReport {
            trend_now,
            extremes,
            by_day,
        },
    })
}

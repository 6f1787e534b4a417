//! # Pretty-Text Rendering
//!
//! Human-readable summary of a report for interactive use. JSON remains
//! the machine contract; this output makes no stability promises.

use crate::{Report, ScoredHour};

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => "unknown".to_string(),
    }
}

/// Render the now-block, tide trend, and the best hour of each window.
pub fn render_pretty(report: &Report) -> String {
    let now = &report.now;
    let mut lines = vec![
        format!("Surf report for: {}", report.location.resolved_name),
        format!("Generated: {}", report.meta.generated_at),
        String::new(),
        "Now:".to_string(),
        format!("  Wave: {} m", fmt_opt(now.wave_height_m)),
        format!(
            "  Swell: {} m @ {} s ({} deg)",
            fmt_opt(now.swell_height_m),
            fmt_opt(now.swell_period_s),
            fmt_opt(now.swell_direction_deg)
        ),
        format!(
            "  Wind: {} m/s gust {} m/s ({} deg)",
            fmt_opt(now.wind_speed_mps),
            fmt_opt(now.wind_gust_mps),
            fmt_opt(now.wind_direction_deg)
        ),
        format!("  Water temp: {} C", fmt_opt(now.water_temperature_c)),
        format!("  Tide trend: {}", report.tides.trend_now),
    ];

    let best_lines: Vec<String> = report
        .forecast
        .windows
        .iter()
        .filter_map(|(label, window)| {
            let top: &ScoredHour = window.best_hours.first()?;
            Some(format!(
                "  {label}: {} (score {}, wave {} m, period {} s)",
                top.hour.time,
                top.score,
                fmt_opt(top.hour.wave_height_m),
                fmt_opt(top.hour.swell_period_s)
            ))
        })
        .collect();
    if !best_lines.is_empty() {
        lines.push(String::new());
        lines.push("Best windows:".to_string());
        lines.extend(best_lines);
    }

    lines.join("\n")
}

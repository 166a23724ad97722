//! Value formatting shared by fragments and the page.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// "2 days, 3 hours, 0 minutes, 5 seconds".
///
/// Leading zero units are dropped; seconds are always present.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let units = [
        (secs / 86_400, "day"),
        (secs % 86_400 / 3_600, "hour"),
        (secs % 3_600 / 60, "minute"),
        (secs % 60, "second"),
    ];

    let parts: Vec<String> = units
        .iter()
        .skip_while(|(n, unit)| *n == 0 && *unit != "second")
        .map(|(n, unit)| {
            if *n == 1 {
                format!("{n} {unit}")
            } else {
                format!("{n} {unit}s")
            }
        })
        .collect();
    parts.join(", ")
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_cpu(percent: f64) -> String {
    format!("{percent:.1}")
}

pub fn format_mb(mb: f64) -> String {
    format!("{mb:.2}")
}

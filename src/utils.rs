use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const ENDC: &str = "\x1b[0m";

pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

pub fn format_latency(latency_ms: f64) -> String {
    format!("{} ms", latency_ms)
}

/// Formats an ISO-8601 timestamp as `dd.MM.yyyy HH:mm` in `tz`.
///
/// Timestamps carrying an offset are converted; ones without are taken as
/// wall time in `tz`. Returns `None` for anything unparsable.
pub fn format_timestamp<Tz>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let raw = raw.trim();
    let local = match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(tz),
        Err(_) => {
            let naive = parse_naive(raw)?;
            tz.from_local_datetime(&naive).earliest()?
        }
    };
    Some(local.format(TIMESTAMP_FORMAT).to_string())
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}

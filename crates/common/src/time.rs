//! Timestamp and duration helpers

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Parse an Azure DevOps ISO-8601 timestamp into UTC.
///
/// A trailing `Z` or explicit offset is honored; a timestamp without any
/// offset is taken to be UTC. Blank or unparseable input yields `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp as UTC ISO-8601 with a trailing `Z`
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Signed elapsed seconds from `start` to `end`
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

/// Format seconds as `HH:MM:SS`, or `n/a` when absent.
///
/// Hours are not wrapped at 24. Fractional seconds round half to even.
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return "n/a".to_string();
    };

    let total = seconds.round_ties_even() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{sign}{hours:02}:{minutes:02}:{secs:02}")
}

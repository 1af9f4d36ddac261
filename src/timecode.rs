//! Fixed-point time codec
//!
//! All event times are stored as integer ticks (10,000,000 ticks = 1 second)
//! so that interval arithmetic stays exact regardless of how the host player
//! represents playback position.

use regex::Regex;
use thiserror::Error;

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Failure to interpret a textual timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("unrecognized timestamp format: {0:?}")]
    Unrecognized(String),
}

/// Convert fractional seconds to ticks, truncating toward zero.
pub fn seconds_to_ticks(seconds: f64) -> i64 {
    (seconds * TICKS_PER_SECOND as f64) as i64
}

/// Convert ticks back to fractional seconds.
pub fn ticks_to_seconds(ticks: i64) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}

/// Parse a timestamp string into ticks.
///
/// Accepts `H:MM:SS` (any number of hour digits), `MM:SS`, and as a last
/// resort a lenient colon-separated duration. Never yields a negative tick
/// count; callers treat a failure as "skip this row".
pub fn parse_timestamp(text: &str) -> Result<i64, TimestampError> {
    let text = text.trim();

    if let Some(ticks) = parse_hms(text) {
        return Ok(ticks);
    }
    if let Some(ticks) = parse_ms(text) {
        return Ok(ticks);
    }
    if let Some(ticks) = parse_lenient(text) {
        return Ok(ticks);
    }

    Err(TimestampError::Unrecognized(text.to_string()))
}

/// Strict `H:MM:SS` shape. Minutes and seconds must be two digits and in range.
fn parse_hms(text: &str) -> Option<i64> {
    let re = Regex::new(r"^(\d+):(\d{2}):(\d{2})$").ok()?;
    let caps = re.captures(text)?;

    let hours: i64 = caps[1].parse().ok()?;
    let minutes: i64 = caps[2].parse().ok()?;
    let seconds: i64 = caps[3].parse().ok()?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    Some((hours * 3600 + minutes * 60 + seconds) * TICKS_PER_SECOND)
}

/// Strict `MM:SS` shape, two digits each.
fn parse_ms(text: &str) -> Option<i64> {
    let re = Regex::new(r"^(\d{2}):(\d{2})$").ok()?;
    let caps = re.captures(text)?;

    let minutes: i64 = caps[1].parse().ok()?;
    let seconds: i64 = caps[2].parse().ok()?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    Some((minutes * 60 + seconds) * TICKS_PER_SECOND)
}

/// Lenient fallback: up to three colon-separated components, fractions allowed.
/// A single component is plain seconds.
fn parse_lenient(text: &str) -> Option<i64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut total_seconds = 0.0_f64;
    for part in &parts {
        let value: f64 = part.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        total_seconds = total_seconds * 60.0 + value;
    }

    Some(seconds_to_ticks(total_seconds))
}

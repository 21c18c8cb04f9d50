//! Time Code Utilities
//!
//! Bidirectional conversion between seconds-as-float and the three textual
//! timestamp conventions used by subtitle formats:
//! - SRT style `HH:MM:SS,mmm` (comma millisecond separator)
//! - VTT style `HH:MM:SS.mmm` (dot millisecond separator)
//! - Frame-coded style `HH:MM:SS:FF` at a fixed 30 fps (CSV export)
//!
//! Parsing accepts either millisecond separator. Formatting decomposes the
//! floored total-millisecond value, so integer components truncate toward
//! zero and the total duration never shifts by more than 1 ms.

use crate::core::{CoreError, CoreResult, TimeSec};

/// Fixed frame rate assumed by the frame-coded timestamp style
pub const FRAME_RATE: u64 = 30;

// =============================================================================
// Parsing
// =============================================================================

/// Parses an `HH:MM:SS,mmm` or `HH:MM:SS.mmm` timestamp into seconds.
///
/// Components must be numeric and the millisecond part, when present, must be
/// 1-3 digits. Anything else is rejected with [`CoreError::InvalidTimestamp`].
pub fn parse_timestamp(ts: &str) -> CoreResult<TimeSec> {
    let trimmed = ts.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() != 3 {
        return Err(CoreError::InvalidTimestamp(ts.to_string()));
    }

    let hours = parse_component(parts[0], ts)?;
    let minutes = parse_component(parts[1], ts)?;

    let (sec_str, millis) = match parts[2].find([',', '.']) {
        Some(pos) => {
            let (sec, frac) = parts[2].split_at(pos);
            (sec, parse_millis(&frac[1..], ts)?)
        }
        None => (parts[2], 0),
    };
    let seconds = parse_component(sec_str, ts)?;

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

fn parse_component(raw: &str, ts: &str) -> CoreResult<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidTimestamp(ts.to_string()));
    }
    raw.parse()
        .map_err(|_| CoreError::InvalidTimestamp(ts.to_string()))
}

/// Parses 1-3 millisecond digits as a fraction (e.g. "5" is 500 ms).
fn parse_millis(raw: &str, ts: &str) -> CoreResult<u64> {
    if raw.is_empty() || raw.len() > 3 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidTimestamp(ts.to_string()));
    }
    let value: u64 = raw
        .parse()
        .map_err(|_| CoreError::InvalidTimestamp(ts.to_string()))?;
    Ok(value * 10u64.pow(3 - raw.len() as u32))
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats seconds as an SRT timestamp (`00:00:00,000`)
pub fn format_srt_timestamp(seconds: TimeSec) -> String {
    let (hours, mins, secs, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

/// Formats seconds as a WebVTT timestamp (`00:00:00.000`)
pub fn format_vtt_timestamp(seconds: TimeSec) -> String {
    let (hours, mins, secs, ms) = split_millis(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
}

/// Formats seconds as a frame-coded timestamp (`00:00:00:00`) at 30 fps
pub fn format_frame_timestamp(seconds: TimeSec) -> String {
    let clamped = seconds.max(0.0);
    let total_secs = clamped as u64;
    let frames = ((clamped - total_secs as f64) * FRAME_RATE as f64 + 1e-6) as u64;
    format!(
        "{:02}:{:02}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60,
        frames.min(FRAME_RATE - 1)
    )
}

/// Decomposes seconds into (hours, minutes, seconds, milliseconds).
///
/// The epsilon compensates for binary representation drift so values parsed
/// from millisecond-precision text format back to the same text.
fn split_millis(seconds: TimeSec) -> (u64, u64, u64, u64) {
    let total_ms = (seconds.max(0.0) * 1000.0 + 1e-6).floor() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    (total_mins / 60, total_mins % 60, secs, ms)
}

// =============================================================================
// Tests
// =============================================================================

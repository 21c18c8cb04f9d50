//! Subtitle File Parser
//!
//! Converts raw SRT/VTT-style subtitle text into an ordered caption
//! sequence.
//!
//! # Block structure
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:03,000
//! Hello world
//!
//! 2
//! 00:00:05,500 --> 00:00:08,000
//! Second caption
//! with multiple lines
//! ```
//!
//! A line containing `-->` is a timestamp line; a pure-integer line before
//! any text is a discardable sequence index (the parser numbers captions
//! itself); any other non-blank line appends to the block's text. A blank
//! line flushes the block if a timestamp has been seen; text-only blocks
//! (e.g. a `WEBVTT` header) are discarded.

use crate::core::{timecode::parse_timestamp, CoreError, CoreResult, TimeSec};

use super::Caption;

/// Placeholder track id assigned by the parser. The caller re-tags parsed
/// captions with a destination track and fresh ids.
const UNASSIGNED_TRACK: i64 = 0;

/// Parses subtitle file content into an ordered caption sequence.
///
/// Captions receive sequential string ids ("1", "2", ...) regardless of the
/// file's own numbering. Malformed timestamp lines fail with
/// [`CoreError::InvalidTimestamp`] or [`CoreError::ValidationError`] rather
/// than producing NaN timings.
pub fn parse_subtitle_file(content: &str) -> CoreResult<Vec<Caption>> {
    let mut captions = Vec::new();
    let mut timing: Option<(TimeSec, TimeSec)> = None;
    let mut text: Option<String> = None;
    let mut index = 1usize;

    for raw in content.lines() {
        let line = raw.trim();

        if line.is_empty() {
            flush_block(&mut captions, &mut timing, &mut text, &mut index);
            continue;
        }

        if line.contains("-->") {
            timing = Some(parse_timestamp_line(line)?);
        } else if text.is_none() && line.parse::<u64>().is_ok() {
            // Sequence index from the source file; ignored in favor of our own
            continue;
        } else {
            match text.as_mut() {
                Some(t) => {
                    t.push('\n');
                    t.push_str(line);
                }
                None => text = Some(line.to_string()),
            }
        }
    }

    // Trailing block without an explicit trailing blank line
    flush_block(&mut captions, &mut timing, &mut text, &mut index);

    Ok(captions)
}

fn flush_block(
    captions: &mut Vec<Caption>,
    timing: &mut Option<(TimeSec, TimeSec)>,
    text: &mut Option<String>,
    index: &mut usize,
) {
    // A block without a timestamp line (e.g. a WEBVTT header or a stray
    // comment) is not a caption.
    if let Some((start, end)) = timing.take() {
        captions.push(Caption::new(
            &index.to_string(),
            UNASSIGNED_TRACK,
            start,
            end,
            &text.take().unwrap_or_default(),
        ));
        *index += 1;
    } else {
        text.take();
    }
}

/// Parses a `start --> end` timestamp line
fn parse_timestamp_line(line: &str) -> CoreResult<(TimeSec, TimeSec)> {
    let parts: Vec<&str> = line.split("-->").collect();
    if parts.len() != 2 {
        return Err(CoreError::ValidationError(format!(
            "Expected 'start --> end' timestamp line: {}",
            line
        )));
    }

    // VTT cue settings may trail the end timestamp
    let end_raw = parts[1].trim();
    let end_str = end_raw.split_whitespace().next().unwrap_or(end_raw);

    let start = parse_timestamp(parts[0].trim())?;
    let end = parse_timestamp(end_str)?;
    Ok((start, end))
}

// =============================================================================
// Tests
// =============================================================================

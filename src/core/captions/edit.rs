//! Caption Structural Editing
//!
//! Split-one-into-N and merge-N-into-one algorithms. Both are pure: they
//! construct replacement captions with fresh ids and never touch session
//! state, so a failed operation leaves the model untouched.

use crate::core::{CoreError, CoreResult};

use super::Caption;

/// Merged text switches from space-joining to line breaks once any input
/// text exceeds this many characters
pub const MERGE_LINE_BREAK_THRESHOLD: usize = 40;

// =============================================================================
// Split
// =============================================================================

/// Splits a caption into `parts` new captions over contiguous equal-length
/// sub-intervals of the original span.
///
/// Text partition policy, in priority order:
/// 1. Exactly `parts - 1` line breaks: split at the author's line breaks.
/// 2. Text contains spaces: contiguous word groups of `ceil(words / parts)`,
///    the last group taking the remainder.
/// 3. No spaces (e.g. CJK text): the same grouping over Unicode code points.
///
/// `parts` must be 2, 3, or 4.
pub fn split_caption(caption: &Caption, parts: usize) -> CoreResult<Vec<Caption>> {
    if !(2..=4).contains(&parts) {
        return Err(CoreError::InvalidSplitCount(parts));
    }
    if !(caption.start < caption.end) {
        return Err(CoreError::InvalidTimeRange(caption.start, caption.end));
    }

    let part_duration = (caption.end - caption.start) / parts as f64;
    let texts = partition_text(&caption.text, parts);

    let result = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let start = caption.start + i as f64 * part_duration;
            // Pin the last end to the original so cumulative rounding error
            // never changes the total span
            let end = if i == parts - 1 {
                caption.end
            } else {
                caption.start + (i + 1) as f64 * part_duration
            };
            Caption::create(caption.track, start, end, &text)
                .with_language(caption.language.clone())
        })
        .collect();

    Ok(result)
}

fn partition_text(text: &str, parts: usize) -> Vec<String> {
    if text.matches('\n').count() == parts - 1 {
        return text.split('\n').map(str::to_string).collect();
    }

    if text.contains(' ') {
        let words: Vec<&str> = text.split_whitespace().collect();
        chunk_ceiling(&words, parts, |group| group.join(" "))
    } else {
        let chars: Vec<char> = text.chars().collect();
        chunk_ceiling(&chars, parts, |group| group.iter().collect())
    }
}

/// Slices `items` into `parts` contiguous groups of `ceil(len / parts)`
/// items each; trailing groups may be short or empty.
fn chunk_ceiling<T, F>(items: &[T], parts: usize, render: F) -> Vec<String>
where
    F: Fn(&[T]) -> String,
{
    let per_part = items.len().div_ceil(parts);
    (0..parts)
        .map(|i| {
            let start = (i * per_part).min(items.len());
            let end = (start + per_part).min(items.len());
            render(&items[start..end])
        })
        .collect()
}

// =============================================================================
// Merge
// =============================================================================

/// Merges two or more captions from the same track into one new caption
/// spanning the minimum start to the maximum end.
///
/// Text join policy: line breaks when more than two captions are merged or
/// any individual text exceeds [`MERGE_LINE_BREAK_THRESHOLD`] characters;
/// otherwise a single space, omitted when the running text already ends in
/// terminal punctuation.
pub fn merge_captions(captions: &[Caption]) -> CoreResult<Caption> {
    if captions.len() < 2 {
        return Err(CoreError::ValidationError(
            "At least two captions are required to merge".to_string(),
        ));
    }

    let mut sorted: Vec<&Caption> = captions.iter().collect();
    sorted.sort_by(|a, b| {
        a.start
            .partial_cmp(&b.start)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let track = sorted[0].track;
    if sorted.iter().any(|c| c.track != track) {
        return Err(CoreError::CrossTrackMerge);
    }

    let start = sorted[0].start;
    let end = sorted.iter().map(|c| c.end).fold(f64::MIN, f64::max);

    let use_line_breaks = sorted.len() > 2
        || sorted
            .iter()
            .any(|c| c.text.chars().count() > MERGE_LINE_BREAK_THRESHOLD);

    let mut text = sorted[0].text.clone();
    for caption in &sorted[1..] {
        if use_line_breaks {
            text.push('\n');
        } else if !ends_with_terminal_punctuation(&text) {
            text.push(' ');
        }
        text.push_str(&caption.text);
    }

    Ok(Caption::create(track, start, end, &text).with_language(sorted[0].language.clone()))
}

fn ends_with_terminal_punctuation(text: &str) -> bool {
    text.ends_with(['.', '!', '?', ',', ':'])
}

// =============================================================================
// Tests
// =============================================================================

//! Transcript Model
//!
//! Data structures for transcription results (full text plus word-level and
//! utterance-level timestamps) and their conversion to caption sequences.

use serde::{Deserialize, Serialize};

use crate::core::{TimeSec, TrackId};

use super::Caption;

/// A cue built from words is flushed once its text would exceed this length
pub const MAX_CUE_CHARS: usize = 42;

/// A cue built from words is flushed once it would span longer than this
pub const MAX_CUE_DURATION_SEC: TimeSec = 5.0;

// =============================================================================
// Transcript
// =============================================================================

/// A single word with timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptWord {
    pub text: String,
    /// Start time in seconds
    pub start: TimeSec,
    /// End time in seconds
    pub end: TimeSec,
    /// Recognition confidence (0.0-1.0)
    #[serde(default)]
    pub confidence: f64,
}

/// A complete utterance (sentence-level span) with timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptUtterance {
    pub text: String,
    pub start: TimeSec,
    pub end: TimeSec,
}

/// A transcription result from an external provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    /// Full transcript text
    pub text: String,
    /// Word-level timestamps
    pub words: Vec<TranscriptWord>,
    /// Utterance-level timestamps
    pub utterances: Vec<TranscriptUtterance>,
}

impl Transcript {
    /// Converts the transcript into captions for the given track.
    ///
    /// Utterance spans are used as cues when present; otherwise cues are
    /// built by greedy word accumulation via [`captions_from_words`].
    pub fn to_captions(&self, track: TrackId) -> Vec<Caption> {
        if !self.utterances.is_empty() {
            self.utterances
                .iter()
                .map(|u| Caption::create(track, u.start, u.end, &u.text))
                .collect()
        } else {
            captions_from_words(&self.words, track)
        }
    }
}

// =============================================================================
// Word Segmentation
// =============================================================================

/// Greedily accumulates words into cues, flushing whenever the accumulated
/// text would exceed [`MAX_CUE_CHARS`] or the cue would span longer than
/// [`MAX_CUE_DURATION_SEC`].
pub fn captions_from_words(words: &[TranscriptWord], track: TrackId) -> Vec<Caption> {
    let mut captions = Vec::new();
    let mut text = String::new();
    let mut start = 0.0;
    let mut end = 0.0;

    for word in words {
        if text.is_empty() {
            text = word.text.clone();
            start = word.start;
            end = word.end;
            continue;
        }

        let appended_len = text.chars().count() + 1 + word.text.chars().count();
        if appended_len > MAX_CUE_CHARS || word.end - start > MAX_CUE_DURATION_SEC {
            captions.push(Caption::create(track, start, end, &text));
            text = word.text.clone();
            start = word.start;
            end = word.end;
        } else {
            text.push(' ');
            text.push_str(&word.text);
            end = word.end;
        }
    }

    if !text.is_empty() {
        captions.push(Caption::create(track, start, end, &text));
    }

    captions
}

// =============================================================================
// Tests
// =============================================================================

//! Caption Data Models
//!
//! Defines data structures for captions and caption tracks.
//!
//! # Overview
//!
//! A session holds an ordered list of [`Track`]s; each track owns a set of
//! [`Caption`]s. Stored caption order is incidental: every read path that
//! presents captions re-derives ordering via [`Track::sorted_captions`].
//! Captions are immutable by convention; structural edits always produce
//! replacement records with fresh ids.

use serde::{Deserialize, Serialize};

use crate::core::{CaptionId, TimeSec, TrackId};

/// Default duration for a caption created at a point in time
pub const DEFAULT_CAPTION_DURATION_SEC: TimeSec = 2.0;

// =============================================================================
// Caption
// =============================================================================

/// A single caption with text and timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    /// Unique identifier, stable for the caption's lifetime
    pub id: CaptionId,
    /// Start time in seconds (`start < end` is mandatory)
    pub start: TimeSec,
    /// End time in seconds
    pub end: TimeSec,
    /// Caption text; may contain embedded `\n` line breaks
    pub text: String,
    /// Owning track
    pub track: TrackId,
    /// Language tag inherited through splits/merges; cosmetic only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Caption {
    /// Creates a new caption with the given id
    pub fn new(id: &str, track: TrackId, start: TimeSec, end: TimeSec, text: &str) -> Self {
        Self {
            id: id.to_string(),
            start,
            end,
            text: text.to_string(),
            track,
            language: None,
        }
    }

    /// Creates a caption with an auto-generated ULID
    pub fn create(track: TrackId, start: TimeSec, end: TimeSec, text: &str) -> Self {
        Self::new(&ulid::Ulid::new().to_string(), track, start, end, text)
    }

    /// Sets the language tag
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Returns the duration of this caption in seconds
    pub fn duration(&self) -> TimeSec {
        self.end - self.start
    }

    /// Returns true if the caption covers the given time point
    /// (inclusive at both ends)
    pub fn contains(&self, time_sec: TimeSec) -> bool {
        time_sec >= self.start && time_sec <= self.end
    }

    /// Returns true if this caption's interval overlaps another's.
    ///
    /// Treats intervals as closed: touching endpoints count as overlapping,
    /// which is what the bilingual export's column matching expects.
    pub fn overlaps(&self, other: &Caption) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

// =============================================================================
// Font Style
// =============================================================================

/// Display-only font settings for a track
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    pub font_family: String,
    pub font_size: u32,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 14,
        }
    }
}

// =============================================================================
// Track
// =============================================================================

/// An ordered named container of captions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique numeric key, derived from the creation timestamp
    pub id: TrackId,
    /// Display name
    pub name: String,
    /// Language code (e.g. "en", "ko", "ja")
    pub language: String,
    /// Captions owned by this track; stored order is not meaningful
    pub captions: Vec<Caption>,
    /// Hidden tracks are excluded from active-caption views and default export
    pub visible: bool,
    /// Display-only font settings
    pub font_style: FontStyle,
}

impl Track {
    /// Creates a new track with an explicit id
    pub fn new(id: TrackId, name: &str, language: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            language: language.to_string(),
            captions: vec![],
            visible: true,
            font_style: FontStyle::default(),
        }
    }

    /// Creates a track whose id is the current timestamp in milliseconds.
    ///
    /// The session bumps the id on collision so ids stay unique even when
    /// two tracks are created within the same millisecond.
    pub fn create(name: &str, language: &str) -> Self {
        Self::new(chrono::Utc::now().timestamp_millis(), name, language)
    }

    /// Adds a caption to this track
    pub fn add_caption(&mut self, caption: Caption) {
        self.captions.push(caption);
    }

    /// Removes a caption by id
    pub fn remove_caption(&mut self, caption_id: &str) -> Option<Caption> {
        let pos = self.captions.iter().position(|c| c.id == caption_id)?;
        Some(self.captions.remove(pos))
    }

    /// Gets a caption by id
    pub fn get_caption(&self, caption_id: &str) -> Option<&Caption> {
        self.captions.iter().find(|c| c.id == caption_id)
    }

    /// Gets a mutable caption by id
    pub fn get_caption_mut(&mut self, caption_id: &str) -> Option<&mut Caption> {
        self.captions.iter_mut().find(|c| c.id == caption_id)
    }

    /// Returns captions ordered by start time.
    ///
    /// Ordering is derived here rather than maintained in storage, so
    /// display order never diverges from it.
    pub fn sorted_captions(&self) -> Vec<&Caption> {
        let mut sorted: Vec<&Caption> = self.captions.iter().collect();
        sorted.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Returns captions covering the given time point (inclusive both ends)
    pub fn captions_at(&self, time_sec: TimeSec) -> Vec<&Caption> {
        self.captions
            .iter()
            .filter(|c| c.contains(time_sec))
            .collect()
    }

    /// Returns the number of captions
    pub fn len(&self) -> usize {
        self.captions.len()
    }

    /// Returns true if the track has no captions
    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

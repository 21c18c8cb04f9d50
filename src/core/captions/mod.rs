//! Caption System Module
//!
//! Provides the caption/subtitle data model and algorithms:
//! - Data models (`Caption`, `Track`, `FontStyle`)
//! - Subtitle file parsing (SRT/VTT-style block text)
//! - Structural editing (split one caption into N, merge N into one)
//! - Transcript-to-caption conversion for transcription results

mod edit;
mod models;
mod parser;
mod transcript;

pub use edit::{merge_captions, split_caption, MERGE_LINE_BREAK_THRESHOLD};
pub use models::{Caption, FontStyle, Track, DEFAULT_CAPTION_DURATION_SEC};
pub use parser::parse_subtitle_file;
pub use transcript::{
    captions_from_words, Transcript, TranscriptUtterance, TranscriptWord, MAX_CUE_CHARS,
    MAX_CUE_DURATION_SEC,
};

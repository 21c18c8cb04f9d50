//! External Service Adapters
//!
//! Provider-backed transcription and translation. Adapters run outside the
//! session's mutation path and only hand back complete results (a transcript
//! or a fully translated track); partial results are never committed.

pub mod transcription;
pub mod translation;

pub use transcription::{AssemblyAiProvider, TranscriptionProvider};
pub use translation::{
    translate_track, DeepLProvider, DeeplPlan, TranslationProvider, TRANSLATION_BATCH_SIZE,
    TRANSLATION_FAILED_PREFIX,
};

/// Progress callback: monotonically increasing percentage (0-100) plus a
/// human-readable phase label
pub type ProgressFn<'a> = &'a (dyn Fn(u8, &str) + Send + Sync);

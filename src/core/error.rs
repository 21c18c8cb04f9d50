//! CaptionStudio Error Definitions
//!
//! Defines error types used throughout the engine.

use thiserror::Error;

use super::{CaptionId, TimeSec, TrackId};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid time range: {0}~{1} seconds")]
    InvalidTimeRange(TimeSec, TimeSec),

    #[error("Split count must be 2, 3, or 4 (got {0})")]
    InvalidSplitCount(usize),

    #[error("Cannot merge captions from different tracks")]
    CrossTrackMerge,

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    #[error("Caption not found: {0}")]
    CaptionNotFound(CaptionId),

    // =========================================================================
    // History Errors
    // =========================================================================
    #[error("Nothing to undo")]
    NothingToUndo,

    // =========================================================================
    // Export Errors
    // =========================================================================
    #[error("Export failed: {0}")]
    ExportError(String),

    // =========================================================================
    // External Service Errors
    // =========================================================================
    #[error("External service error: {message}")]
    ExternalService {
        message: String,
        status: Option<u16>,
        code: Option<String>,
    },

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Creates an external-service error with just a message
    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalService {
            message: message.into(),
            status: None,
            code: None,
        }
    }

    /// Creates an external-service error carrying an HTTP status and an
    /// optional provider error code
    pub fn external_with_status(
        message: impl Into<String>,
        status: u16,
        code: Option<String>,
    ) -> Self {
        Self::ExternalService {
            message: message.into(),
            status: Some(status),
            code,
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::ExternalService {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
            code: None,
        }
    }
}

//! CaptionStudio Core Engine
//!
//! Core editing engine module.
//! Handles the caption data model, structural editing, session state,
//! undo history, subtitle import/export, and external service adapters.

pub mod captions;
pub mod export;
pub mod services;
pub mod session;
pub mod timecode;

// Re-export common types
mod types;
pub use types::*;

mod error;
pub use error::*;

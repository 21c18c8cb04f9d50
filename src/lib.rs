//! CaptionStudio Core Library
//!
//! Caption editing and timeline-synchronization engine: the in-memory data
//! model for tracks and captions, structural editing (split/merge),
//! subtitle parsing and export, snapshot-based undo history, and adapters
//! for external transcription/translation services.
//!
//! The library contains no presentation code. A host application owns an
//! [`core::session::EditorSession`] and drives it from its UI event loop;
//! playback-position reads (`active_captions`) are pure queries and never
//! mutate session state.

pub mod core;

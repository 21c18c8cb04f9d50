//! Core Type Definitions
//!
//! Defines fundamental types used throughout the engine.

// =============================================================================
// ID Types
// =============================================================================

/// Caption unique identifier (ULID)
pub type CaptionId = String;

/// Track unique numeric key, derived from the creation timestamp and kept
/// unique for the session lifetime
pub type TrackId = i64;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

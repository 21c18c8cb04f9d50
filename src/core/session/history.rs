//! Session History
//!
//! Linear undo over deep snapshots of the track list. The history is an
//! append-only, truncatable snapshot sequence with a cursor; pushing after
//! an undo discards the redo tail beyond the cursor.
//!
//! The manager is a two-state machine: *recording* (every committed
//! mutation appends a snapshot) and *suspended* (snapshots are ignored,
//! used while a restore is applied so the restoration is not itself
//! recorded).

use crate::core::{captions::Track, CoreError, CoreResult};

/// Snapshot-based linear undo history
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Vec<Track>>,
    cursor: Option<usize>,
    suspended: bool,
}

impl History {
    /// Creates an empty history in the recording state
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a deep snapshot of the track list and advances the cursor,
    /// truncating any redo tail beyond it. Ignored while suspended.
    pub fn record(&mut self, tracks: &[Track]) {
        if self.suspended {
            return;
        }
        match self.cursor {
            Some(i) => self.snapshots.truncate(i + 1),
            None => self.snapshots.clear(),
        }
        self.snapshots.push(tracks.to_vec());
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Steps the cursor back one snapshot and returns a deep copy of it.
    ///
    /// Fails with [`CoreError::NothingToUndo`] at the history boundary.
    pub fn undo(&mut self) -> CoreResult<Vec<Track>> {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                Ok(self.snapshots[i - 1].clone())
            }
            _ => Err(CoreError::NothingToUndo),
        }
    }

    /// Returns true if an undo step is available
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    /// Stops recording snapshots (used while a restore is applied)
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Resumes recording snapshots
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Drops all snapshots and resets the cursor
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
        self.suspended = false;
    }

    /// Returns the number of stored snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if no snapshot has been recorded
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n as i64).map(|i| Track::new(i, "t", "en")).collect()
    }

    #[test]
    fn test_record_advances_cursor() {
        let mut history = History::new();
        history.record(&tracks(0));
        history.record(&tracks(1));
        history.record(&tracks(2));
        assert_eq!(history.len(), 3);
        assert!(history.can_undo());
    }

    #[test]
    fn test_undo_restores_previous_snapshot() {
        let mut history = History::new();
        history.record(&tracks(1));
        history.record(&tracks(2));

        let restored = history.undo().unwrap();
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn test_undo_at_boundary_is_reported() {
        let mut history = History::new();
        assert!(matches!(history.undo(), Err(CoreError::NothingToUndo)));

        history.record(&tracks(1));
        // Cursor at 0: still nothing to undo
        assert!(matches!(history.undo(), Err(CoreError::NothingToUndo)));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_record_after_undo_truncates_redo_tail() {
        let mut history = History::new();
        history.record(&tracks(1));
        history.record(&tracks(2));
        history.record(&tracks(3));

        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.len(), 3);

        history.record(&tracks(5));
        assert_eq!(history.len(), 2);

        let restored = history.undo().unwrap();
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn test_suspended_history_ignores_records() {
        let mut history = History::new();
        history.record(&tracks(1));
        history.suspend();
        history.record(&tracks(2));
        assert_eq!(history.len(), 1);
        history.resume();
        history.record(&tracks(2));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut history = History::new();
        history.record(&tracks(1));
        history.record(&tracks(2));
        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(matches!(history.undo(), Err(CoreError::NothingToUndo)));
    }
}

//! Session State
//!
//! The authoritative in-memory representation of tracks, captions, and
//! selection. All structural invariants live here: `start < end` on every
//! caption write, atomic all-or-nothing splices, and selection references
//! that are reconciled after every mutation so they never dangle.
//!
//! `SessionState` knows nothing about history; the
//! [`EditorSession`](super::EditorSession) facade pairs each committed
//! mutation with a history snapshot.

use tracing::debug;

use crate::core::{
    captions::{Caption, Track},
    CaptionId, CoreError, CoreResult, TimeSec, TrackId,
};

// =============================================================================
// Edit Session
// =============================================================================

/// An in-progress text edit of a single caption.
///
/// While active, the caption is locked against external overwrite; the model
/// is only touched on commit.
#[derive(Clone, Debug)]
pub struct EditSession {
    caption_id: CaptionId,
    draft: String,
}

impl EditSession {
    /// Id of the caption being edited
    pub fn caption_id(&self) -> &CaptionId {
        &self.caption_id
    }

    /// Current draft text
    pub fn draft(&self) -> &str {
        &self.draft
    }
}

// =============================================================================
// Session State
// =============================================================================

/// In-memory session state: ordered track list plus selection
#[derive(Debug, Default)]
pub struct SessionState {
    /// Tracks in display order
    pub tracks: Vec<Track>,
    primary_selection: Option<CaptionId>,
    multi_selection: Vec<CaptionId>,
    edit_session: Option<EditSession>,
}

fn validate_time_range(start: TimeSec, end: TimeSec) -> CoreResult<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || end < 0.0 {
        return Err(CoreError::ValidationError(
            "Caption time range must be finite and non-negative".to_string(),
        ));
    }
    if start >= end {
        return Err(CoreError::InvalidTimeRange(start, end));
    }
    Ok(())
}

impl SessionState {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Track Operations
    // =========================================================================

    /// Gets a track by id
    pub fn get_track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Gets a mutable track by id
    pub fn get_track_mut(&mut self, track_id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    /// Returns the next free track id.
    ///
    /// Ids derive from the creation timestamp in milliseconds; creating two
    /// tracks within the same millisecond bumps past the existing maximum so
    /// ids stay unique for the session lifetime.
    pub fn next_track_id(&self) -> TrackId {
        let now = chrono::Utc::now().timestamp_millis();
        match self.tracks.iter().map(|t| t.id).max() {
            Some(max) if max >= now => max + 1,
            _ => now,
        }
    }

    /// Creates and appends a new empty track, returning its id
    pub fn add_track(&mut self, name: &str, language: &str) -> TrackId {
        let id = self.next_track_id();
        self.tracks.push(Track::new(id, name, language));
        id
    }

    /// Appends an externally built track (e.g. a translation result),
    /// re-keying it if its id collides with an existing track
    pub fn insert_track(&mut self, mut track: Track) -> TrackId {
        if self.get_track(track.id).is_some() {
            let id = self.next_track_id();
            for caption in &mut track.captions {
                caption.track = id;
            }
            track.id = id;
        }
        let id = track.id;
        self.tracks.push(track);
        id
    }

    /// Removes a track and all its captions atomically, dropping any
    /// selection references to them
    pub fn remove_track(&mut self, track_id: TrackId) -> CoreResult<Track> {
        let pos = self
            .tracks
            .iter()
            .position(|t| t.id == track_id)
            .ok_or(CoreError::TrackNotFound(track_id))?;
        let removed = self.tracks.remove(pos);
        debug!(track_id, captions = removed.len(), "Removed track");
        self.reconcile_selection();
        Ok(removed)
    }

    /// Moves the track at `from` to display position `to` (pure permutation,
    /// no id renumbering)
    pub fn move_track(&mut self, from: usize, to: usize) -> CoreResult<()> {
        if from >= self.tracks.len() || to >= self.tracks.len() {
            return Err(CoreError::ValidationError(format!(
                "Track position out of range: {} -> {}",
                from, to
            )));
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        Ok(())
    }

    /// Shows or hides a track
    pub fn set_track_visible(&mut self, track_id: TrackId, visible: bool) -> CoreResult<()> {
        let track = self
            .get_track_mut(track_id)
            .ok_or(CoreError::TrackNotFound(track_id))?;
        track.visible = visible;
        Ok(())
    }

    // =========================================================================
    // Caption Operations
    // =========================================================================

    /// Finds a caption across all tracks
    pub fn find_caption(&self, caption_id: &str) -> Option<&Caption> {
        self.tracks.iter().find_map(|t| t.get_caption(caption_id))
    }

    /// Returns the owning track id of a caption
    pub fn caption_track_id(&self, caption_id: &str) -> Option<TrackId> {
        self.find_caption(caption_id).map(|c| c.track)
    }

    /// Adds a caption to its track
    pub fn add_caption(&mut self, caption: Caption) -> CoreResult<()> {
        validate_time_range(caption.start, caption.end)?;
        let track = self
            .get_track_mut(caption.track)
            .ok_or(CoreError::TrackNotFound(caption.track))?;
        track.add_caption(caption);
        Ok(())
    }

    /// Updates a caption's text and/or time range.
    ///
    /// The caption must exist and must not be locked by an open edit
    /// session; a partial time update keeps the other bound.
    pub fn update_caption(
        &mut self,
        caption_id: &str,
        text: Option<&str>,
        start: Option<TimeSec>,
        end: Option<TimeSec>,
    ) -> CoreResult<()> {
        self.assert_not_locked(caption_id)?;
        let track_id = self
            .caption_track_id(caption_id)
            .ok_or_else(|| CoreError::CaptionNotFound(caption_id.to_string()))?;

        let caption = self
            .get_track_mut(track_id)
            .and_then(|t| t.get_caption_mut(caption_id))
            .ok_or_else(|| CoreError::CaptionNotFound(caption_id.to_string()))?;

        let new_start = start.unwrap_or(caption.start);
        let new_end = end.unwrap_or(caption.end);
        validate_time_range(new_start, new_end)?;

        caption.start = new_start;
        caption.end = new_end;
        if let Some(text) = text {
            caption.text = text.to_string();
        }
        Ok(())
    }

    /// Atomically replaces a set of captions with new ones (split/merge
    /// results). Everything is validated before anything is touched, so a
    /// failure leaves the model unchanged.
    pub fn splice_captions(&mut self, remove: &[CaptionId], insert: Vec<Caption>) -> CoreResult<()> {
        for id in remove {
            self.assert_not_locked(id)?;
            if self.find_caption(id).is_none() {
                return Err(CoreError::CaptionNotFound(id.clone()));
            }
        }
        for caption in &insert {
            validate_time_range(caption.start, caption.end)?;
            if self.get_track(caption.track).is_none() {
                return Err(CoreError::TrackNotFound(caption.track));
            }
        }

        for id in remove {
            if let Some(track_id) = self.caption_track_id(id) {
                if let Some(track) = self.get_track_mut(track_id) {
                    track.remove_caption(id);
                }
            }
        }
        for caption in insert {
            if let Some(track) = self.get_track_mut(caption.track) {
                track.add_caption(caption);
            }
        }
        self.reconcile_selection();
        Ok(())
    }

    /// Removes captions by id, returning how many were found and removed
    pub fn remove_captions(&mut self, caption_ids: &[CaptionId]) -> CoreResult<usize> {
        for id in caption_ids {
            self.assert_not_locked(id)?;
        }
        let mut removed = 0;
        for id in caption_ids {
            if let Some(track_id) = self.caption_track_id(id) {
                if let Some(track) = self.get_track_mut(track_id) {
                    if track.remove_caption(id).is_some() {
                        removed += 1;
                    }
                }
            }
        }
        self.reconcile_selection();
        Ok(removed)
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// Captions of visible tracks covering the given time point
    /// (inclusive at both ends), ordered by start
    pub fn active_captions(&self, time_sec: TimeSec) -> Vec<&Caption> {
        let mut active: Vec<&Caption> = self
            .tracks
            .iter()
            .filter(|t| t.visible)
            .flat_map(|t| t.captions.iter().filter(|c| c.contains(time_sec)))
            .collect();
        active.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        active
    }

    /// All captions of visible tracks, ordered by start (navigation order)
    pub fn all_captions_sorted(&self) -> Vec<&Caption> {
        let mut captions: Vec<&Caption> = self
            .tracks
            .iter()
            .filter(|t| t.visible)
            .flat_map(|t| t.captions.iter())
            .collect();
        captions.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        captions
    }

    /// Next caption after the primary selection in navigation order,
    /// wrapping around cyclically; the first caption when nothing is
    /// selected
    pub fn next_caption(&self) -> Option<&Caption> {
        let captions = self.all_captions_sorted();
        if captions.is_empty() {
            return None;
        }
        let index = match &self.primary_selection {
            Some(id) => captions
                .iter()
                .position(|c| &c.id == id)
                .map(|i| (i + 1) % captions.len())
                .unwrap_or(0),
            None => 0,
        };
        Some(captions[index])
    }

    /// Previous caption before the primary selection in navigation order,
    /// wrapping around cyclically; the last caption when nothing is
    /// selected
    pub fn previous_caption(&self) -> Option<&Caption> {
        let captions = self.all_captions_sorted();
        if captions.is_empty() {
            return None;
        }
        let index = match &self.primary_selection {
            Some(id) => captions
                .iter()
                .position(|c| &c.id == id)
                .map(|i| (i + captions.len() - 1) % captions.len())
                .unwrap_or(captions.len() - 1),
            None => captions.len() - 1,
        };
        Some(captions[index])
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Primary-selected caption id, if any
    pub fn selected_caption(&self) -> Option<&CaptionId> {
        self.primary_selection.as_ref()
    }

    /// Multi-selection set (includes the primary selection)
    pub fn selected_captions(&self) -> &[CaptionId] {
        &self.multi_selection
    }

    /// Single-selects a caption, resetting the multi-selection to it
    pub fn select_caption(&mut self, caption_id: &str) -> CoreResult<()> {
        if self.find_caption(caption_id).is_none() {
            return Err(CoreError::CaptionNotFound(caption_id.to_string()));
        }
        self.primary_selection = Some(caption_id.to_string());
        self.multi_selection = vec![caption_id.to_string()];
        Ok(())
    }

    /// Append-toggles a caption in the multi-selection set
    pub fn toggle_caption_selection(&mut self, caption_id: &str) -> CoreResult<()> {
        if self.find_caption(caption_id).is_none() {
            return Err(CoreError::CaptionNotFound(caption_id.to_string()));
        }
        if let Some(pos) = self.multi_selection.iter().position(|id| id == caption_id) {
            self.multi_selection.remove(pos);
            if self.primary_selection.as_deref() == Some(caption_id) {
                self.primary_selection = self.multi_selection.last().cloned();
            }
        } else {
            self.multi_selection.push(caption_id.to_string());
            self.primary_selection = Some(caption_id.to_string());
        }
        Ok(())
    }

    /// Clears the selection
    pub fn clear_selection(&mut self) {
        self.primary_selection = None;
        self.multi_selection.clear();
    }

    /// Refreshes selection references by id lookup, dropping ids that no
    /// longer resolve to a caption. Called after every model mutation so
    /// stale references never dangle.
    pub fn reconcile_selection(&mut self) {
        self.multi_selection
            .retain(|id| self.tracks.iter().any(|t| t.get_caption(id).is_some()));
        if let Some(id) = &self.primary_selection {
            if self.find_caption(id).is_none() {
                self.primary_selection = self.multi_selection.last().cloned();
            }
        }
        if let Some(edit) = &self.edit_session {
            if self.find_caption(&edit.caption_id).is_none() {
                debug!(caption_id = %edit.caption_id, "Edited caption disappeared; cancelling edit");
                self.edit_session = None;
            }
        }
    }

    // =========================================================================
    // Edit Session
    // =========================================================================

    /// Begins a text edit on a caption, locking it against external
    /// overwrite until the edit is committed or cancelled
    pub fn begin_edit(&mut self, caption_id: &str) -> CoreResult<()> {
        if self.edit_session.is_some() {
            return Err(CoreError::ValidationError(
                "An edit is already in progress".to_string(),
            ));
        }
        let caption = self
            .find_caption(caption_id)
            .ok_or_else(|| CoreError::CaptionNotFound(caption_id.to_string()))?;
        self.edit_session = Some(EditSession {
            caption_id: caption_id.to_string(),
            draft: caption.text.clone(),
        });
        Ok(())
    }

    /// The edit session in progress, if any
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit_session.as_ref()
    }

    /// Replaces the draft text of the edit in progress
    pub fn set_edit_draft(&mut self, text: &str) -> CoreResult<()> {
        let edit = self.edit_session.as_mut().ok_or_else(|| {
            CoreError::ValidationError("No edit in progress".to_string())
        })?;
        edit.draft = text.to_string();
        Ok(())
    }

    /// Commits the edit in progress, writing the draft back to the caption.
    /// Returns true if the text actually changed.
    pub fn commit_edit(&mut self) -> CoreResult<bool> {
        let edit = self.edit_session.take().ok_or_else(|| {
            CoreError::ValidationError("No edit in progress".to_string())
        })?;
        let track_id = self
            .caption_track_id(&edit.caption_id)
            .ok_or(CoreError::CaptionNotFound(edit.caption_id.clone()))?;
        let caption = self
            .get_track_mut(track_id)
            .and_then(|t| t.get_caption_mut(&edit.caption_id))
            .ok_or(CoreError::CaptionNotFound(edit.caption_id.clone()))?;

        let changed = caption.text != edit.draft;
        caption.text = edit.draft;
        Ok(changed)
    }

    /// Discards the edit in progress
    pub fn cancel_edit(&mut self) {
        self.edit_session = None;
    }

    fn assert_not_locked(&self, caption_id: &str) -> CoreResult<()> {
        if let Some(edit) = &self.edit_session {
            if edit.caption_id == caption_id {
                return Err(CoreError::ValidationError(
                    "Caption is locked by an edit in progress".to_string(),
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Clears all tracks and selection state
    pub fn close(&mut self) {
        self.tracks.clear();
        self.primary_selection = None;
        self.multi_selection.clear();
        self.edit_session = None;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_captions() -> (SessionState, TrackId, Vec<CaptionId>) {
        let mut state = SessionState::new();
        let track_id = state.add_track("Subtitles", "en");
        let mut ids = vec![];
        for (start, end, text) in [(0.0, 2.0, "one"), (3.0, 5.0, "two"), (6.0, 8.0, "three")] {
            let caption = Caption::create(track_id, start, end, text);
            ids.push(caption.id.clone());
            state.add_caption(caption).unwrap();
        }
        (state, track_id, ids)
    }

    // -------------------------------------------------------------------------
    // Track Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_track_ids_unique_within_same_millisecond() {
        let mut state = SessionState::new();
        let a = state.add_track("A", "en");
        let b = state.add_track("B", "en");
        let c = state.add_track("C", "en");
        assert!(a < b && b < c);
    }

    #[test]
    fn test_insert_track_rekeys_on_collision() {
        let mut state = SessionState::new();
        let existing = state.add_track("A", "en");

        let mut track = Track::new(existing, "B", "ko");
        track.add_caption(Caption::create(existing, 0.0, 1.0, "text"));
        let new_id = state.insert_track(track);

        assert_ne!(new_id, existing);
        let inserted = state.get_track(new_id).unwrap();
        assert_eq!(inserted.captions[0].track, new_id);
    }

    #[test]
    fn test_move_track_is_pure_permutation() {
        let mut state = SessionState::new();
        let a = state.add_track("A", "en");
        let b = state.add_track("B", "en");
        let c = state.add_track("C", "en");

        state.move_track(2, 0).unwrap();
        let order: Vec<TrackId> = state.tracks.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![c, a, b]);

        assert!(state.move_track(0, 5).is_err());
    }

    #[test]
    fn test_remove_track_clears_selection() {
        let (mut state, track_id, ids) = state_with_captions();
        state.select_caption(&ids[0]).unwrap();
        state.toggle_caption_selection(&ids[1]).unwrap();

        state.remove_track(track_id).unwrap();

        assert!(state.selected_caption().is_none());
        assert!(state.selected_captions().is_empty());
        assert!(state.tracks.is_empty());
    }

    #[test]
    fn test_remove_missing_track_fails() {
        let mut state = SessionState::new();
        assert!(matches!(
            state.remove_track(42),
            Err(CoreError::TrackNotFound(42))
        ));
    }

    // -------------------------------------------------------------------------
    // Caption Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_caption_requires_existing_track() {
        let mut state = SessionState::new();
        let caption = Caption::create(99, 0.0, 1.0, "orphan");
        assert!(matches!(
            state.add_caption(caption),
            Err(CoreError::TrackNotFound(99))
        ));
    }

    #[test]
    fn test_update_caption_rejects_inverted_range() {
        let (mut state, _, ids) = state_with_captions();
        let err = state
            .update_caption(&ids[0], None, Some(5.0), Some(3.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimeRange(_, _)));

        // Original untouched
        let caption = state.find_caption(&ids[0]).unwrap();
        assert_eq!(caption.start, 0.0);
        assert_eq!(caption.end, 2.0);
    }

    #[test]
    fn test_update_caption_partial_time_keeps_other_bound() {
        let (mut state, _, ids) = state_with_captions();
        state
            .update_caption(&ids[0], Some("updated"), Some(1.0), None)
            .unwrap();
        let caption = state.find_caption(&ids[0]).unwrap();
        assert_eq!(caption.start, 1.0);
        assert_eq!(caption.end, 2.0);
        assert_eq!(caption.text, "updated");
    }

    #[test]
    fn test_splice_is_all_or_nothing() {
        let (mut state, track_id, ids) = state_with_captions();
        let replacement = vec![
            Caption::create(track_id, 0.0, 1.0, "a"),
            // Invalid insert: unknown track
            Caption::create(track_id + 1, 1.0, 2.0, "b"),
        ];
        let err = state
            .splice_captions(&[ids[0].clone()], replacement)
            .unwrap_err();
        assert!(matches!(err, CoreError::TrackNotFound(_)));

        // Nothing was removed or inserted
        assert!(state.find_caption(&ids[0]).is_some());
        assert_eq!(state.get_track(track_id).unwrap().len(), 3);
    }

    // -------------------------------------------------------------------------
    // Derived View Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_active_captions_excludes_hidden_tracks() {
        let (mut state, track_id, _) = state_with_captions();
        let other = state.add_track("Hidden", "ko");
        state
            .add_caption(Caption::create(other, 0.0, 10.0, "hidden"))
            .unwrap();
        state.set_track_visible(other, false).unwrap();

        let active = state.active_captions(1.0);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].track, track_id);
    }

    #[test]
    fn test_active_captions_inclusive_bounds() {
        let (state, _, _) = state_with_captions();
        assert_eq!(state.active_captions(2.0).len(), 1);
        assert_eq!(state.active_captions(2.5).len(), 0);
        assert_eq!(state.active_captions(3.0).len(), 1);
    }

    #[test]
    fn test_caption_navigation_wraps_cyclically() {
        let (mut state, _, ids) = state_with_captions();

        // Nothing selected: next is first, previous is last
        assert_eq!(state.next_caption().unwrap().id, ids[0]);
        assert_eq!(state.previous_caption().unwrap().id, ids[2]);

        state.select_caption(&ids[2]).unwrap();
        assert_eq!(state.next_caption().unwrap().id, ids[0]);

        state.select_caption(&ids[0]).unwrap();
        assert_eq!(state.previous_caption().unwrap().id, ids[2]);
    }

    // -------------------------------------------------------------------------
    // Selection Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_single_select_resets_multi_selection() {
        let (mut state, _, ids) = state_with_captions();
        state.select_caption(&ids[0]).unwrap();
        state.toggle_caption_selection(&ids[1]).unwrap();
        assert_eq!(state.selected_captions().len(), 2);

        state.select_caption(&ids[2]).unwrap();
        assert_eq!(state.selected_captions(), &[ids[2].clone()]);
        assert_eq!(state.selected_caption(), Some(&ids[2]));
    }

    #[test]
    fn test_toggle_removes_and_fixes_primary() {
        let (mut state, _, ids) = state_with_captions();
        state.select_caption(&ids[0]).unwrap();
        state.toggle_caption_selection(&ids[1]).unwrap();
        assert_eq!(state.selected_caption(), Some(&ids[1]));

        state.toggle_caption_selection(&ids[1]).unwrap();
        assert_eq!(state.selected_captions(), &[ids[0].clone()]);
        assert_eq!(state.selected_caption(), Some(&ids[0]));
    }

    #[test]
    fn test_select_missing_caption_fails() {
        let (mut state, _, _) = state_with_captions();
        assert!(matches!(
            state.select_caption("nope"),
            Err(CoreError::CaptionNotFound(_))
        ));
    }

    #[test]
    fn test_reconcile_drops_dangling_ids() {
        let (mut state, _, ids) = state_with_captions();
        state.select_caption(&ids[0]).unwrap();
        state.toggle_caption_selection(&ids[1]).unwrap();

        state.remove_captions(&[ids[1].clone()]).unwrap();

        assert_eq!(state.selected_captions(), &[ids[0].clone()]);
        assert_eq!(state.selected_caption(), Some(&ids[0]));
    }

    // -------------------------------------------------------------------------
    // Edit Session Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_edit_commit_writes_draft() {
        let (mut state, _, ids) = state_with_captions();
        state.begin_edit(&ids[0]).unwrap();
        state.set_edit_draft("rewritten").unwrap();
        let changed = state.commit_edit().unwrap();

        assert!(changed);
        assert_eq!(state.find_caption(&ids[0]).unwrap().text, "rewritten");
        assert!(state.edit_session().is_none());
    }

    #[test]
    fn test_edit_cancel_discards_draft() {
        let (mut state, _, ids) = state_with_captions();
        state.begin_edit(&ids[0]).unwrap();
        state.set_edit_draft("rewritten").unwrap();
        state.cancel_edit();

        assert_eq!(state.find_caption(&ids[0]).unwrap().text, "one");
    }

    #[test]
    fn test_edit_locks_caption_against_external_writes() {
        let (mut state, _, ids) = state_with_captions();
        state.begin_edit(&ids[0]).unwrap();

        let err = state
            .update_caption(&ids[0], Some("external"), None, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(state.remove_captions(&[ids[0].clone()]).is_err());

        // Other captions remain editable
        state
            .update_caption(&ids[1], Some("fine"), None, None)
            .unwrap();
    }

    #[test]
    fn test_edit_cancelled_when_caption_disappears() {
        let (mut state, track_id, ids) = state_with_captions();
        state.begin_edit(&ids[0]).unwrap();
        state.remove_track(track_id).unwrap();
        assert!(state.edit_session().is_none());
    }

    #[test]
    fn test_only_one_edit_at_a_time() {
        let (mut state, _, ids) = state_with_captions();
        state.begin_edit(&ids[0]).unwrap();
        assert!(state.begin_edit(&ids[1]).is_err());
    }

    // -------------------------------------------------------------------------
    // Lifecycle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_close_clears_everything() {
        let (mut state, _, ids) = state_with_captions();
        state.select_caption(&ids[0]).unwrap();
        state.close();

        assert!(state.tracks.is_empty());
        assert!(state.selected_caption().is_none());
        assert!(state.selected_captions().is_empty());
    }
}

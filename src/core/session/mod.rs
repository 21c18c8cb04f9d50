//! Editor Session
//!
//! The top-level facade over [`SessionState`] and [`History`]. Every
//! committed mutation runs as a single step: mutate the model, reconcile
//! selection, snapshot the track list. Reads never touch history.

pub mod history;
pub mod state;

pub use history::History;
pub use state::{EditSession, SessionState};

use tracing::debug;

use crate::core::{
    captions::{
        merge_captions, parse_subtitle_file, split_caption, Caption, FontStyle, Track, Transcript,
        DEFAULT_CAPTION_DURATION_SEC,
    },
    export::{export_captions, ExportFile, ExportFormat, ExportSelection},
    services::{translate_track, ProgressFn, TranscriptionProvider, TranslationProvider},
    CaptionId, CoreError, CoreResult, TimeSec, TrackId,
};

/// A caption editing session with linear undo
#[derive(Debug)]
pub struct EditorSession {
    state: SessionState,
    history: History,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// Creates an empty session.
    ///
    /// The empty track list is recorded as the baseline snapshot, so K
    /// mutations can be undone by exactly K undo steps.
    pub fn new() -> Self {
        let mut session = Self {
            state: SessionState::new(),
            history: History::new(),
        };
        session.history.record(&session.state.tracks);
        session
    }

    /// Read access to the underlying state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Tracks in display order
    pub fn tracks(&self) -> &[Track] {
        &self.state.tracks
    }

    fn commit(&mut self) {
        self.state.reconcile_selection();
        self.history.record(&self.state.tracks);
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Parses subtitle file content into a new track.
    ///
    /// Parsed captions carry placeholder ids and no track; they are re-tagged
    /// here with fresh ids and the new track's id.
    pub fn import_subtitles(
        &mut self,
        content: &str,
        name: &str,
        language: &str,
    ) -> CoreResult<TrackId> {
        let parsed = parse_subtitle_file(content)?;
        let track_id = self.state.add_track(name, language);
        if let Some(track) = self.state.get_track_mut(track_id) {
            for caption in parsed {
                track.add_caption(Caption::create(
                    track_id,
                    caption.start,
                    caption.end,
                    &caption.text,
                ));
            }
        }
        debug!(track_id, name, "Imported subtitle track");
        self.commit();
        Ok(track_id)
    }

    // =========================================================================
    // Track Operations
    // =========================================================================

    /// Adds an empty track
    pub fn add_track(&mut self, name: &str, language: &str) -> TrackId {
        let id = self.state.add_track(name, language);
        self.commit();
        id
    }

    /// Removes a track and all its captions
    pub fn remove_track(&mut self, track_id: TrackId) -> CoreResult<()> {
        self.state.remove_track(track_id)?;
        self.commit();
        Ok(())
    }

    /// Moves a track to a new display position
    pub fn reorder_track(&mut self, from: usize, to: usize) -> CoreResult<()> {
        self.state.move_track(from, to)?;
        self.commit();
        Ok(())
    }

    /// Shows or hides a track
    pub fn set_track_visible(&mut self, track_id: TrackId, visible: bool) -> CoreResult<()> {
        self.state.set_track_visible(track_id, visible)?;
        self.commit();
        Ok(())
    }

    /// Renames a track
    pub fn rename_track(&mut self, track_id: TrackId, name: &str) -> CoreResult<()> {
        let track = self
            .state
            .get_track_mut(track_id)
            .ok_or(CoreError::TrackNotFound(track_id))?;
        track.name = name.to_string();
        self.commit();
        Ok(())
    }

    /// Replaces a track's font settings
    pub fn set_track_font_style(&mut self, track_id: TrackId, style: FontStyle) -> CoreResult<()> {
        let track = self
            .state
            .get_track_mut(track_id)
            .ok_or(CoreError::TrackNotFound(track_id))?;
        track.font_style = style;
        self.commit();
        Ok(())
    }

    // =========================================================================
    // Caption Operations
    // =========================================================================

    /// Adds a caption starting at `start` with the default duration
    pub fn add_caption(
        &mut self,
        track_id: TrackId,
        start: TimeSec,
        text: &str,
    ) -> CoreResult<CaptionId> {
        let caption = Caption::create(track_id, start, start + DEFAULT_CAPTION_DURATION_SEC, text);
        let id = caption.id.clone();
        self.state.add_caption(caption)?;
        self.commit();
        Ok(id)
    }

    /// Updates a caption's text and/or time range
    pub fn update_caption(
        &mut self,
        caption_id: &str,
        text: Option<&str>,
        start: Option<TimeSec>,
        end: Option<TimeSec>,
    ) -> CoreResult<()> {
        self.state.update_caption(caption_id, text, start, end)?;
        self.commit();
        Ok(())
    }

    /// Deletes captions by id, returning how many were removed
    pub fn delete_captions(&mut self, caption_ids: &[CaptionId]) -> CoreResult<usize> {
        let removed = self.state.remove_captions(caption_ids)?;
        if removed > 0 {
            self.commit();
        }
        Ok(removed)
    }

    /// Splits a caption into 2, 3, or 4 replacement captions.
    ///
    /// The replacement is atomic: on any failure the model is unchanged.
    pub fn split_caption(&mut self, caption_id: &str, parts: usize) -> CoreResult<Vec<CaptionId>> {
        let original = self
            .state
            .find_caption(caption_id)
            .ok_or_else(|| CoreError::CaptionNotFound(caption_id.to_string()))?
            .clone();
        let replacements = split_caption(&original, parts)?;
        let ids: Vec<CaptionId> = replacements.iter().map(|c| c.id.clone()).collect();

        self.state
            .splice_captions(&[original.id.clone()], replacements)?;
        debug!(caption_id, parts, "Split caption");
        self.commit();
        Ok(ids)
    }

    /// Merges two or more same-track captions into one, selecting the result
    pub fn merge_captions(&mut self, caption_ids: &[CaptionId]) -> CoreResult<CaptionId> {
        let mut inputs = Vec::with_capacity(caption_ids.len());
        for id in caption_ids {
            let caption = self
                .state
                .find_caption(id)
                .ok_or_else(|| CoreError::CaptionNotFound(id.clone()))?;
            inputs.push(caption.clone());
        }
        let merged = merge_captions(&inputs)?;
        let merged_id = merged.id.clone();

        self.state.splice_captions(caption_ids, vec![merged])?;
        self.state.select_caption(&merged_id)?;
        debug!(count = caption_ids.len(), "Merged captions");
        self.commit();
        Ok(merged_id)
    }

    /// Merges the currently selected captions
    pub fn merge_selected(&mut self) -> CoreResult<CaptionId> {
        let selected = self.state.selected_captions().to_vec();
        self.merge_captions(&selected)
    }

    // =========================================================================
    // Undo
    // =========================================================================

    /// Restores the previous snapshot.
    ///
    /// Recording is suspended while the snapshot is applied so the
    /// restoration itself is not recorded as a new history entry.
    pub fn undo(&mut self) -> CoreResult<()> {
        let tracks = self.history.undo()?;
        self.history.suspend();
        self.state.tracks = tracks;
        self.state.reconcile_selection();
        self.history.resume();
        Ok(())
    }

    /// Returns true if an undo step is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    // =========================================================================
    // Selection & Navigation
    // =========================================================================

    /// Single-selects a caption
    pub fn select_caption(&mut self, caption_id: &str) -> CoreResult<()> {
        self.state.select_caption(caption_id)
    }

    /// Append-toggles a caption in the multi-selection
    pub fn toggle_caption_selection(&mut self, caption_id: &str) -> CoreResult<()> {
        self.state.toggle_caption_selection(caption_id)
    }

    /// Clears the selection
    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    /// Captions of visible tracks covering the given time point
    pub fn active_captions(&self, time_sec: TimeSec) -> Vec<&Caption> {
        self.state.active_captions(time_sec)
    }

    /// Selects the next caption in navigation order, wrapping around
    pub fn select_next_caption(&mut self) -> Option<CaptionId> {
        let id = self.state.next_caption().map(|c| c.id.clone())?;
        self.state.select_caption(&id).ok()?;
        Some(id)
    }

    /// Selects the previous caption in navigation order, wrapping around
    pub fn select_previous_caption(&mut self) -> Option<CaptionId> {
        let id = self.state.previous_caption().map(|c| c.id.clone())?;
        self.state.select_caption(&id).ok()?;
        Some(id)
    }

    // =========================================================================
    // Text Editing
    // =========================================================================

    /// Begins a text edit on a caption
    pub fn begin_edit(&mut self, caption_id: &str) -> CoreResult<()> {
        self.state.begin_edit(caption_id)
    }

    /// Replaces the draft text of the edit in progress
    pub fn set_edit_draft(&mut self, text: &str) -> CoreResult<()> {
        self.state.set_edit_draft(text)
    }

    /// Commits the edit in progress; a no-change commit records no history
    pub fn commit_edit(&mut self) -> CoreResult<()> {
        if self.state.commit_edit()? {
            self.commit();
        }
        Ok(())
    }

    /// Discards the edit in progress
    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    // =========================================================================
    // External Services
    // =========================================================================

    /// Transcribes media through a provider and commits the result as a new
    /// track. The model is untouched until the transcript fully resolves.
    pub async fn transcribe_media(
        &mut self,
        provider: &dyn TranscriptionProvider,
        media: &[u8],
        name: &str,
        language: &str,
        progress: Option<ProgressFn<'_>>,
    ) -> CoreResult<TrackId> {
        let transcript = provider.transcribe(media, progress).await?;
        Ok(self.add_transcript_track(&transcript, name, language))
    }

    /// Converts a transcript into a new caption track
    pub fn add_transcript_track(
        &mut self,
        transcript: &Transcript,
        name: &str,
        language: &str,
    ) -> TrackId {
        let track_id = self.state.add_track(name, language);
        if let Some(track) = self.state.get_track_mut(track_id) {
            track.captions = transcript.to_captions(track_id);
        }
        debug!(track_id, name, "Added transcript track");
        self.commit();
        track_id
    }

    /// Translates a track through a provider and commits the result as a
    /// new track. The model is untouched until the whole run resolves.
    pub async fn translate_track(
        &mut self,
        provider: &dyn TranslationProvider,
        source_track: TrackId,
        target_lang: &str,
        progress: Option<ProgressFn<'_>>,
    ) -> CoreResult<TrackId> {
        let source = self
            .state
            .get_track(source_track)
            .ok_or(CoreError::TrackNotFound(source_track))?
            .clone();
        let translated = translate_track(provider, &source, target_lang, progress).await?;
        let id = self.state.insert_track(translated);
        self.commit();
        Ok(id)
    }

    // =========================================================================
    // Export & Lifecycle
    // =========================================================================

    /// Produces export files for the given format and track selection
    pub fn export(
        &self,
        format: ExportFormat,
        selection: &ExportSelection,
    ) -> CoreResult<Vec<ExportFile>> {
        export_captions(&self.state.tracks, format, selection)
    }

    /// Clears all tracks, selection, and history, re-establishing the empty
    /// baseline snapshot
    pub fn close(&mut self) {
        self.state.close();
        self.history.clear();
        self.history.record(&self.state.tracks);
    }
}

// =============================================================================
// Tests
// =============================================================================

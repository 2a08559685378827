//! The presentation session: one end-to-end cycle from document
//! ingestion through editing to export.
//!
//! A [`Session`] owns the in-memory presentation and the navigation
//! cursor. The generation request is the only suspending operation;
//! its terminal resolution is guarded by a [`GenerationTicket`] so a
//! stale result arriving after a reset or a newer request is ignored
//! instead of resurrecting a discarded deck.

use crate::error::{Error, Result};
use crate::layout::EditTarget;
use crate::normalize;
use crate::types::{Presentation, Slide};

/// Which stage of the cycle the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a source document; editing is unavailable.
    AwaitingSource,
    /// A generation request is in flight; editing is unavailable.
    Processing,
    /// A presentation is held in memory and accepting edits.
    Editing,
}

/// Handle for one generation request, valid until the session is reset
/// or a newer request begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
}

impl GenerationTicket {
    /// The raw epoch value, for round-tripping through a foreign
    /// boundary (e.g. a JS shell driving the async request).
    pub fn raw(&self) -> u64 {
        self.epoch
    }

    /// Rebuild a ticket from a raw epoch value.
    pub fn from_raw(epoch: u64) -> Self {
        Self { epoch }
    }
}

/// A single-field edit applied to one slide.
///
/// There is deliberately no variant for `id` or `layout`; those fields
/// are never editable.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideEdit {
    Title(String),
    Subtitle(String),
    /// Replace exactly one bullet, leaving all other indices intact.
    Point { index: usize, text: String },
    /// Replace the whole bullet list.
    Points(Vec<String>),
    VisualDescription(String),
    SpeakerNotes(String),
    ImageUrl(String),
}

impl SlideEdit {
    /// Build the edit a region's marker target maps to.
    pub fn for_target(target: EditTarget, value: String) -> Self {
        match target {
            EditTarget::Title => Self::Title(value),
            EditTarget::Subtitle => Self::Subtitle(value),
            EditTarget::Point(index) => Self::Point { index, text: value },
            EditTarget::VisualDescription => Self::VisualDescription(value),
            EditTarget::SpeakerNotes => Self::SpeakerNotes(value),
            EditTarget::ImageUrl => Self::ImageUrl(value),
        }
    }
}

/// An explicitly owned editing session.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    status: String,
    error: Option<String>,
    presentation: Option<Presentation>,
    cursor: usize,
    epoch: u64,
    stamp: u64,
}

impl Session {
    /// Create a session in the upload state.
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingSource,
            status: String::new(),
            error: None,
            presentation: None,
            cursor: 0,
            epoch: 0,
            stamp: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current progress line while processing.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The most recent user-facing error message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slide_count(&self) -> usize {
        self.presentation.as_ref().map_or(0, |p| p.slide_count())
    }

    /// The slide the cursor points at, if a presentation is open.
    pub fn current_slide(&self) -> Option<&Slide> {
        self.presentation.as_ref()?.slides.get(self.cursor)
    }

    /// Enter the processing state for a new generation request.
    ///
    /// Any held presentation is discarded and the epoch is bumped, so
    /// the resolution of an older request becomes a no-op. The stamp
    /// seeds fallback slide ids when the result lands.
    pub fn begin_generation(&mut self, stamp: u64, status: impl Into<String>) -> GenerationTicket {
        self.epoch += 1;
        self.stamp = stamp;
        self.phase = Phase::Processing;
        self.status = status.into();
        self.error = None;
        self.presentation = None;
        self.cursor = 0;
        GenerationTicket { epoch: self.epoch }
    }

    /// Update the progress line for an in-flight request.
    ///
    /// Returns false without touching anything if the ticket is stale.
    pub fn set_status(&mut self, ticket: GenerationTicket, status: impl Into<String>) -> bool {
        if !self.ticket_is_live(ticket) {
            return false;
        }
        self.status = status.into();
        true
    }

    /// Apply the terminal resolution of a generation request.
    ///
    /// A stale ticket (superseded or reset) is ignored and false is
    /// returned. On success the deck is normalized and the session
    /// enters editing at slide zero; on failure the message is
    /// recorded and the session returns to the upload state. A partial
    /// presentation is never applied.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<Presentation>,
    ) -> bool {
        if !self.ticket_is_live(ticket) {
            log::debug!("Ignoring stale generation resolution (epoch {})", ticket.epoch);
            return false;
        }

        self.status.clear();
        match result {
            Ok(mut presentation) => {
                normalize::finalize_generated(&mut presentation, self.stamp);
                self.presentation = Some(presentation);
                self.cursor = 0;
                self.error = None;
                self.phase = Phase::Editing;
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.presentation = None;
                self.phase = Phase::AwaitingSource;
            }
        }
        true
    }

    /// Discard everything and return to the upload state.
    ///
    /// Bumps the epoch so any unresolved generation request becomes
    /// stale.
    pub fn reset(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self::new();
        self.epoch = epoch;
    }

    /// Dismiss the surfaced error message.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Move the cursor forward, clamped at the last slide.
    pub fn next_slide(&mut self) {
        self.set_cursor(self.cursor.saturating_add(1));
    }

    /// Move the cursor back, clamped at the first slide.
    pub fn previous_slide(&mut self) {
        self.set_cursor(self.cursor.saturating_sub(1));
    }

    /// Move the cursor to the given index, clamped to the deck bounds.
    /// A no-op outside the editing phase.
    pub fn set_cursor(&mut self, index: usize) {
        if self.phase != Phase::Editing {
            return;
        }
        let count = self.slide_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = index.min(count - 1);
    }

    /// Apply a single-field edit to the slide with the given id.
    ///
    /// Edits commit immediately and replace only the addressed field;
    /// a `Point` edit replaces exactly that index. An index equal to
    /// the list length appends, so editing a rendered default (the
    /// stat of a BigNumber slide with no points) still commits. The
    /// slide's id and layout are never touched.
    pub fn apply_edit(&mut self, slide_id: &str, edit: SlideEdit) -> Result<()> {
        if self.phase != Phase::Editing {
            return Err(Error::NotEditing);
        }
        let presentation = self.presentation.as_mut().ok_or(Error::NotEditing)?;
        let slide = presentation
            .slide_mut(slide_id)
            .ok_or_else(|| Error::SlideNotFound(slide_id.to_string()))?;

        match edit {
            SlideEdit::Title(text) => slide.title = text,
            SlideEdit::Subtitle(text) => slide.subtitle = Some(text),
            SlideEdit::Point { index, text } => {
                let len = slide.points.len();
                if index == len {
                    slide.points.push(text);
                } else {
                    let point = slide
                        .points
                        .get_mut(index)
                        .ok_or(Error::PointIndexOutOfRange { index, len })?;
                    *point = text;
                }
            }
            SlideEdit::Points(points) => slide.points = points,
            SlideEdit::VisualDescription(text) => slide.visual_description = text,
            SlideEdit::SpeakerNotes(text) => slide.speaker_notes = text,
            SlideEdit::ImageUrl(url) => {
                slide.image_url = Some(url);
                slide.is_image_generating = false;
            }
        }
        Ok(())
    }

    /// Flag a slide's image as pending regeneration. Completion is an
    /// ordinary `ImageUrl` edit, which clears the flag.
    pub fn mark_image_generating(&mut self, slide_id: &str) -> Result<()> {
        if self.phase != Phase::Editing {
            return Err(Error::NotEditing);
        }
        let presentation = self.presentation.as_mut().ok_or(Error::NotEditing)?;
        let slide = presentation
            .slide_mut(slide_id)
            .ok_or_else(|| Error::SlideNotFound(slide_id.to_string()))?;
        slide.is_image_generating = true;
        Ok(())
    }

    fn ticket_is_live(&self, ticket: GenerationTicket) -> bool {
        ticket.epoch == self.epoch && self.phase == Phase::Processing
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

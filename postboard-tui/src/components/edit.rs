use postboard_types::FieldErrors;

use crate::api::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Viewing,
    Editing,
    /// Editing, with the update request in flight
    Saving,
}

/// Viewing/editing state machine shared by post and comment cards.
///
/// Entering edit mode snapshots the displayed content; the draft is edited in
/// place and cancel puts the snapshot back untouched.
#[derive(Debug, Clone)]
pub struct InlineEditor<T> {
    content: T,
    snapshot: Option<T>,
    saving: bool,
    errors: FieldErrors,
}

impl<T: Clone> InlineEditor<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            snapshot: None,
            saving: false,
            errors: FieldErrors::new(),
        }
    }

    pub fn phase(&self) -> EditPhase {
        match (&self.snapshot, self.saving) {
            (None, _) => EditPhase::Viewing,
            (Some(_), false) => EditPhase::Editing,
            (Some(_), true) => EditPhase::Saving,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Editing and not waiting on the server
    pub fn draft_is_open(&self) -> bool {
        self.phase() == EditPhase::Editing
    }

    /// Displayed content, or the draft while editing
    pub fn content(&self) -> &T {
        &self.content
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Enter edit mode. Only the owner may edit; returns whether the
    /// editor is now in edit mode.
    pub fn begin(&mut self, is_owner: bool) -> bool {
        if !is_owner {
            return false;
        }
        if self.snapshot.is_none() {
            self.snapshot = Some(self.content.clone());
            self.errors = FieldErrors::new();
        }
        true
    }

    /// The draft, while it may be changed
    pub fn draft_mut(&mut self) -> Option<&mut T> {
        match self.phase() {
            EditPhase::Editing => Some(&mut self.content),
            _ => None,
        }
    }

    /// Leave edit mode, restoring the snapshot. Ignored while saving.
    pub fn cancel(&mut self) -> bool {
        if self.saving {
            return false;
        }
        match self.snapshot.take() {
            Some(original) => {
                self.content = original;
                self.errors = FieldErrors::new();
                true
            }
            None => false,
        }
    }

    /// Start saving; returns the draft to send
    pub fn submit(&mut self) -> Option<T> {
        if self.phase() != EditPhase::Editing {
            return None;
        }
        self.saving = true;
        self.errors = FieldErrors::new();
        Some(self.content.clone())
    }

    /// Apply the server's answer to a submit.
    ///
    /// Success replaces the content with the echoed value and returns to
    /// viewing. Failure keeps the editor open with the draft intact and
    /// records any field errors.
    pub fn complete(&mut self, result: ApiResult<T>) -> Result<(), ApiError> {
        if !self.saving {
            log::warn!("Ignoring edit completion with no save in flight");
            return Ok(());
        }
        self.saving = false;
        match result {
            Ok(echoed) => {
                self.content = echoed;
                self.snapshot = None;
                Ok(())
            }
            Err(e) => {
                if let Some(errors) = e.field_errors() {
                    self.errors = errors.clone();
                }
                Err(e)
            }
        }
    }

    /// Replace the displayed content from outside (e.g. a refreshed copy).
    /// Ignored while editing.
    pub fn reset(&mut self, content: T) {
        if self.snapshot.is_none() {
            self.content = content;
        }
    }
}

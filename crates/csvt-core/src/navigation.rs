//! Cursor movement and tag edits.
//!
//! Navigation is plain cursor arithmetic over `0..len`, so any record can be
//! revisited or corrected at any time, including after the session reached
//! [`NavigationState::Complete`]. Re-tagging overwrites; no history is kept.

use tracing::{debug, info};

use csvt_model::IndexError;

use crate::error::NavigationError;
use crate::session::{Cursor, SessionState};

/// Where the session stands from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationState {
    /// The cursor is on a record awaiting a decision.
    Editing,
    /// The cursor is on a record that already has a tag.
    Reviewing,
    /// Every record is tagged.
    Complete,
}

impl SessionState {
    pub fn state(&self) -> NavigationState {
        match self.cursor {
            Cursor::Complete => NavigationState::Complete,
            Cursor::At(index) => match self.store().is_annotated(index) {
                Ok(true) => NavigationState::Reviewing,
                _ => NavigationState::Editing,
            },
        }
    }

    /// Counts used for the progress line.
    pub fn progress(&self) -> Progress {
        let total = self.len();
        let annotated = self.store().annotated_count();
        let skipped = match self.cursor {
            Cursor::At(index) => self
                .store()
                .iter()
                .take(index)
                .filter(|r| !r.is_annotated())
                .count(),
            Cursor::Complete => 0,
        };
        Progress {
            total,
            annotated,
            skipped,
        }
    }

    fn first_unannotated_after(&self, from: Option<usize>) -> Option<usize> {
        let len = self.len();
        let untagged = |idx: &usize| matches!(self.store().is_annotated(*idx), Ok(false));
        match from {
            Some(from) => ((from + 1)..len)
                .find(untagged)
                .or_else(|| (0..=from.min(len.saturating_sub(1))).find(untagged)),
            None => (0..len).find(untagged),
        }
    }
}

/// Tagged/untagged counts at a point in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub annotated: usize,
    /// Untagged records before the cursor.
    pub skipped: usize,
}

/// Applies navigation and tag edits to a borrowed session.
///
/// Every operation either fully applies or leaves the session unchanged.
pub struct Navigator<'s> {
    session: &'s mut SessionState,
}

impl<'s> Navigator<'s> {
    pub fn new(session: &'s mut SessionState) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionState {
        self.session
    }

    pub fn state(&self) -> NavigationState {
        self.session.state()
    }

    /// Move to the first untagged record after the cursor, wrapping around.
    ///
    /// The wrapped search includes the current record, so the cursor only
    /// becomes `Complete` when no untagged record is left anywhere.
    pub fn next(&mut self) -> NavigationState {
        let target = self.session.first_unannotated_after(self.session.cursor.index());
        self.session.cursor = match target {
            Some(index) => Cursor::At(index),
            None => Cursor::Complete,
        };
        debug!(cursor = ?self.session.cursor, "next");
        self.state()
    }

    /// Defer the current record and move on like [`Navigator::next`].
    pub fn skip(&mut self) -> NavigationState {
        if let Some(index) = self.session.cursor.index() {
            debug!(index, "skip");
        }
        self.next()
    }

    /// Step back one record, stopping at the first one.
    ///
    /// From `Complete` this selects the last record.
    pub fn previous(&mut self) -> NavigationState {
        let len = self.session.len();
        self.session.cursor = match self.session.cursor {
            Cursor::At(index) => Cursor::At(index.saturating_sub(1)),
            Cursor::Complete if len > 0 => Cursor::At(len - 1),
            Cursor::Complete => Cursor::Complete,
        };
        self.state()
    }

    /// Step forward one record regardless of tags, stopping at the last one.
    pub fn advance(&mut self) -> NavigationState {
        let len = self.session.len();
        if let Cursor::At(index) = self.session.cursor {
            self.session.cursor = Cursor::At((index + 1).min(len - 1));
        }
        self.state()
    }

    /// Move to the nearest untagged record before the cursor, if any.
    pub fn previous_unannotated(&mut self) -> NavigationState {
        if let Cursor::At(index) = self.session.cursor {
            let target = (0..index)
                .rev()
                .find(|idx| matches!(self.session.store().is_annotated(*idx), Ok(false)));
            if let Some(target) = target {
                self.session.cursor = Cursor::At(target);
            }
        }
        self.state()
    }

    /// Select any record by index.
    pub fn jump_to(&mut self, index: usize) -> Result<NavigationState, NavigationError> {
        let len = self.session.len();
        if index >= len {
            return Err(IndexError { index, len }.into());
        }
        self.session.cursor = Cursor::At(index);
        debug!(index, "jump");
        Ok(self.state())
    }

    /// Tag the current record, then move to the next untagged one.
    pub fn tag_current(&mut self, tag: &str) -> Result<NavigationState, NavigationError> {
        let index = self
            .session
            .cursor
            .index()
            .ok_or(NavigationError::NoCurrentRecord)?;
        let (store, registry) = self.session.parts_mut();
        store.set_tag(index, tag, registry)?;
        debug!(index, "tagged record");
        let state = self.next();
        if state == NavigationState::Complete {
            info!(records = self.session.len(), "all records tagged");
        }
        Ok(state)
    }

    /// Register a new tag. Returns `true` when the registry grew.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let (_, registry) = self.session.parts_mut();
        let added = registry.add(tag);
        if added {
            info!(tags = registry.len(), "registered new tag");
        }
        added
    }
}

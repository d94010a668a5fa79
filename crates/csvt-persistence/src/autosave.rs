//! Unsaved change tracking.

use std::time::Instant;

/// Tracks whether the in-memory session differs from the file on disk.
///
/// Drives auto-save after each mutating command and the "unsaved changes"
/// notice on exit.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Changes since the last successful save.
    pending: usize,

    /// When the first unsaved change was made.
    /// Reset when saved.
    first_unsaved_change: Option<Instant>,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.pending > 0
    }

    /// Number of changes since the last save.
    #[inline]
    pub fn pending_changes(&self) -> usize {
        self.pending
    }

    /// Record one change to the session.
    pub fn mark_dirty(&mut self) {
        self.pending += 1;
        if self.first_unsaved_change.is_none() {
            self.first_unsaved_change = Some(Instant::now());
        }
    }

    /// Mark that a save has completed successfully.
    pub fn save_complete(&mut self) {
        self.pending = 0;
        self.first_unsaved_change = None;
    }

    /// Get milliseconds since the first unsaved change.
    pub fn ms_since_first_unsaved(&self) -> Option<u64> {
        self.first_unsaved_change
            .map(|t| u64::try_from(t.elapsed().as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_clean() {
        let tracker = DirtyTracker::new();
        assert!(!tracker.is_dirty());
        assert!(tracker.ms_since_first_unsaved().is_none());
    }

    #[test]
    fn test_mark_dirty_counts_changes() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty();
        tracker.mark_dirty();
        assert!(tracker.is_dirty());
        assert_eq!(tracker.pending_changes(), 2);
        assert!(tracker.ms_since_first_unsaved().is_some());
    }

    #[test]
    fn test_save_complete() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_dirty();
        tracker.save_complete();
        assert!(!tracker.is_dirty());
        assert_eq!(tracker.pending_changes(), 0);
        assert!(tracker.ms_since_first_unsaved().is_none());
    }
}

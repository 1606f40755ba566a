//! Unsaved-change tracking.

/// Tracks unsaved edits to a product document.
///
/// Edits bump a revision counter. A save remembers the revision it carried,
/// so edits made while the save is in flight keep the session dirty.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Incremented on every model edit.
    revision: u64,

    /// Revision known to be stored.
    saved_revision: u64,

    /// Revision carried by the save in progress.
    saving: Option<u64>,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Check if a save is in progress.
    #[inline]
    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record an edit.
    pub fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    /// Mark that a save of the current revision has started.
    pub fn start_save(&mut self) {
        self.saving = Some(self.revision);
    }

    /// Mark that the save in progress has been stored.
    pub fn save_complete(&mut self) {
        if let Some(revision) = self.saving.take() {
            self.saved_revision = revision;
        }
    }

    /// Mark that the save in progress failed; edits stay unsaved.
    pub fn save_failed(&mut self) {
        self.saving = None;
    }

    /// The document was replaced by a stored copy.
    pub fn mark_clean(&mut self) {
        self.saved_revision = self.revision;
        self.saving = None;
    }
}

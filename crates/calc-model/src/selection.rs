//! Transient preview selection.
//!
//! A [`SelectionState`] records what a preview session is looking at: the
//! active view and the set of switched-on options. It is never persisted and
//! lives exactly as long as the preview session that owns it.

use std::collections::BTreeSet;

/// What the current preview session is looking at.
///
/// `seeded` separates "not initialised yet" from "the customer switched
/// everything off": once defaults have been applied, an empty option set is a
/// valid choice and is left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    active_view: Option<String>,
    active_options: BTreeSet<String>,
    seeded: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_view(&self) -> Option<&str> {
        self.active_view.as_deref()
    }

    pub fn set_active_view(&mut self, key: Option<String>) {
        self.active_view = key;
    }

    pub fn active_options(&self) -> &BTreeSet<String> {
        &self.active_options
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_options.contains(id)
    }

    /// Switches an option on. Empty ids are never tracked.
    pub fn activate(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.active_options.insert(id.to_string())
    }

    pub fn deactivate(&mut self, id: &str) -> bool {
        self.active_options.remove(id)
    }

    /// Flips an option and returns whether it is now active.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.deactivate(id) {
            false
        } else {
            self.activate(id)
        }
    }

    pub fn clear_options(&mut self) {
        self.active_options.clear();
    }

    /// Keeps only the active ids for which `keep` returns true.
    pub fn retain_options<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.active_options.retain(|id| keep(id));
    }

    /// Carries the active flag over to a renamed option.
    pub fn rename(&mut self, from: &str, to: &str) {
        if self.deactivate(from) {
            self.activate(to);
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Activates `ids` and records that defaults have been applied.
    pub fn seed<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.activate(id.as_ref());
        }
        self.seeded = true;
    }

    pub fn mark_seeded(&mut self) {
        self.seeded = true;
    }
}

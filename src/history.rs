//! Command history.
//!
//! Mirrors the toolkit's history abstraction: a small trait so callers can
//! plug in persistent storage, plus an in-memory implementation used by
//! default and in tests.

use std::sync::{Arc, Mutex};

/// A source of previously entered lines, newest-appended-last.
///
/// Implementations only need to support appending and iterating; the
/// [`Buffer`](crate::buffer::Buffer) layer owns cursor/search state on top
/// of whatever `load` returns.
pub trait History: Send + Sync {
    /// Return all stored entries, oldest first.
    fn load(&self) -> Vec<String>;

    /// Append a new entry. Implementations may deduplicate consecutive
    /// identical entries; this one does.
    fn append(&self, entry: String);
}

/// An in-memory history, newest entries kept at the end of the list.
pub struct InMemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl InMemoryHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Seed a history with existing entries, oldest first.
    pub fn with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl History for InMemoryHistory {
    fn load(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn append(&self, entry: String) {
        if entry.is_empty() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.last().map(|last| last == &entry).unwrap_or(false) {
            return;
        }
        entries.push(entry);
    }
}

/// A history that stores nothing; `load` always returns an empty list and
/// `append` is a no-op. Used as the default for non-interactive prompts.
pub struct NullHistory;

impl History for NullHistory {
    fn load(&self) -> Vec<String> {
        Vec::new()
    }

    fn append(&self, _entry: String) {}
}

/// A shared handle to a history implementation, cheap to clone.
pub type SharedHistory = Arc<dyn History>;

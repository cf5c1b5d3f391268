//! In-memory capture store for tests

use crate::core::{LogEntry, Sink};
use parking_lot::RwLock;
use std::sync::Arc;

/// Explicitly owned store of captured log entries
///
/// Clones share the same entries. Each test should create its own store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink appending entries for `category` to this store
    pub fn sink_for(&self, category: &str) -> Sink {
        let entries = Arc::clone(&self.entries);
        let category = category.to_string();
        Sink::new(move |level, message, payload| {
            entries
                .write()
                .push(LogEntry::new(level, category.as_str(), message, payload));
            Ok(())
        })
    }

    /// Snapshot of the captured entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

//! Bounded in-process history of completed asks.
//!
//! Newest first, capped at a fixed capacity, gone on restart. Failures
//! are recorded too -- a question whose generated SQL would not run is
//! exactly the kind of thing worth seeing in `history`.

use std::collections::VecDeque;
use std::sync::Mutex;

use tabletalk_types::query::HistoryEntry;

/// Fixed-capacity ring of recent asks, shared across the CLI and HTTP
/// surfaces.
///
/// Interior mutability behind a std `Mutex`: critical sections are a
/// push or a clone, never an await.
pub struct HistoryRing {
    entries: Mutex<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record a completed ask, evicting the oldest entry at capacity.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if entries.len() == self.capacity {
            entries.pop_back();
        }
        entries.push_front(entry);
    }

    /// Most recent entries, newest first, up to `limit` when given.
    pub fn recent(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let take = limit.unwrap_or(entries.len());
        entries.iter().take(take).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

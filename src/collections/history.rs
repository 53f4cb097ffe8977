use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::domain::{SearchHistoryEntry, SearchKind};
use crate::store::JsonStore;

const BLOB: &str = "search_history";

/// Most entries the cache keeps; older ones are evicted.
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded, deduplicating, newest-first cache of past searches, persisted
/// in full after every mutation.
pub struct SearchHistory {
    store: Arc<JsonStore>,
    entries: Mutex<Vec<SearchHistoryEntry>>,
}

impl SearchHistory {
    /// Load the persisted cache; a missing or corrupt blob starts empty.
    pub fn load(store: Arc<JsonStore>) -> Self {
        let mut entries: Vec<SearchHistoryEntry> = store.load(BLOB);
        entries.truncate(HISTORY_CAPACITY);
        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    /// Record a search at the front of the cache.
    ///
    /// An existing entry for the same `(query, kind)` pair is replaced, so
    /// repeating a search refreshes its timestamp and result count instead
    /// of accumulating duplicates.
    pub fn record(&self, query: &str, kind: SearchKind, results_count: usize) {
        let entry = SearchHistoryEntry::new(query.to_string(), kind, results_count);
        let mut entries = self.lock();
        entries.retain(|e| e.query != entry.query || e.kind != entry.kind);
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAPACITY);
        self.persist(&entries);
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.clear();
        self.persist(&entries);
    }

    /// All entries, newest first.
    pub fn all(&self) -> Vec<SearchHistoryEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn persist(&self, entries: &[SearchHistoryEntry]) {
        if let Err(e) = self.store.save(BLOB, entries) {
            warn!(error = %e, "failed to persist search history");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SearchHistoryEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! Recent-search history: most-recent-first, deduplicated, bounded

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::StoreError;
use crate::storage::{get_json, keys, set_json, KeyValueStore};

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
    write_lock: Mutex<()>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
            write_lock: Mutex::new(()),
        }
    }

    /// Persisted queries, newest first. Corrupt data reads as empty.
    pub fn load(&self) -> Vec<String> {
        let mut entries: Vec<String> =
            get_json(self.store.as_ref(), keys::RECENT_SEARCHES).unwrap_or_default();
        entries.truncate(self.limit);
        entries
    }

    /// Move `query` to the front, drop duplicates and trim to the limit
    pub fn record(&self, query: &str) -> Result<Vec<String>, StoreError> {
        if query.trim().is_empty() {
            return Ok(self.load());
        }
        let _guard = self.write_lock.lock();
        let mut entries = self.load();
        entries.retain(|q| q != query);
        entries.insert(0, query.to_string());
        entries.truncate(self.limit);
        set_json(self.store.as_ref(), keys::RECENT_SEARCHES, &entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(keys::RECENT_SEARCHES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn history() -> SearchHistory {
        SearchHistory::new(Arc::new(MemoryStore::new()), DEFAULT_HISTORY_LIMIT)
    }

    #[test]
    fn test_record_twice_keeps_single_entry_at_front() {
        let history = history();
        history.record("xyz").unwrap();
        history.record("abc").unwrap();
        history.record("abc").unwrap();

        let entries = history.load();
        assert_eq!(entries[0], "abc");
        assert_eq!(entries.iter().filter(|q| *q == "abc").count(), 1);
        assert_eq!(entries, vec!["abc", "xyz"]);
    }

    #[test]
    fn test_length_never_exceeds_limit() {
        let history = history();
        for i in 0..20 {
            history.record(&format!("query {}", i)).unwrap();
            assert!(history.load().len() <= DEFAULT_HISTORY_LIMIT);
        }
        assert_eq!(history.load()[0], "query 19");
        assert_eq!(history.load()[4], "query 15");
    }

    #[test]
    fn test_existing_entry_moves_to_front() {
        let history = history();
        for q in ["a", "b", "c"] {
            history.record(q).unwrap();
        }
        history.record("a").unwrap();
        assert_eq!(history.load(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_corrupt_history_reads_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(keys::RECENT_SEARCHES, "{\"broken\":").unwrap();
        let history = SearchHistory::new(store, DEFAULT_HISTORY_LIMIT);
        assert!(history.load().is_empty());
        history.record("akademi").unwrap();
        assert_eq!(history.load(), vec!["akademi"]);
    }

    #[test]
    fn test_blank_query_ignored() {
        let history = history();
        history.record("   ").unwrap();
        assert!(history.load().is_empty());
    }
}

//! Session-scoped series cache.
//!
//! The cache is an explicit object owned by the caller (one per TUI session,
//! one per CLI run) rather than ambient global state, so tests can construct
//! their own and stale entries cannot leak across runs. It is advisory:
//! correctness never depends on a hit.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::domain::SeriesTable;

struct Entry {
    stored_at: Instant,
    table: SeriesTable,
}

/// TTL-bounded cache keyed by series id.
pub struct SeriesCache {
    ttl: Duration,
    entries: HashMap<String, Entry>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// A live entry for `id`, or `None` if absent or past its TTL.
    /// Expired entries are evicted on access.
    pub fn get(&mut self, id: &str) -> Option<SeriesTable> {
        let expired = match self.entries.get(id) {
            Some(entry) => entry.stored_at.elapsed() >= self.ttl,
            None => return None,
        };

        if expired {
            self.entries.remove(id);
            return None;
        }

        self.entries.get(id).map(|e| e.table.clone())
    }

    pub fn insert(&mut self, table: SeriesTable) {
        self.entries.insert(
            table.id.clone(),
            Entry {
                stored_at: Instant::now(),
                table,
            },
        );
    }

    /// Drop one entry (used by the TUI's forced refresh).
    pub fn invalidate(&mut self, id: &str) {
        self.entries.remove(id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

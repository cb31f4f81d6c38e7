use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::hashing::hash_question;

/// Snapshot of a cache's physical occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently stored (expired entries count until
    /// evicted by a subsequent access).
    pub size: usize,
    /// Configured capacity.
    pub max_size: usize,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    last_used: u64,
}

struct Inner<V> {
    entries: HashMap<[u8; 32], Entry<V>>,
    // Monotonic access counter; higher means more recently used.
    tick: u64,
}

impl<V> Inner<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| *key);

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

/// Bounded TTL+LRU cache keyed by question text.
///
/// Keys are BLAKE3 hashes of the question ([`hash_question`]), so identical
/// questions always address the same slot. `get`/`contains` treat an entry
/// older than `max_age` as absent and evict it as a side effect; this is
/// observable only through [`QueryCache::stats`] and subsequent lookups,
/// never through a returned value. Recency is updated on both `get` and
/// `insert`, and inserting past capacity removes the least-recently-used
/// entry. Entries are never mutated in place: inserting over an existing
/// key replaces the value and its timestamp.
pub struct QueryCache<V> {
    inner: Mutex<Inner<V>>,
    max_size: usize,
    max_age: Duration,
}

impl<V> QueryCache<V> {
    /// Creates a cache holding at most `max_size` entries, each valid for
    /// `max_age` after insertion.
    ///
    /// # Panics
    ///
    /// Panics if `max_size` is zero.
    pub fn new(max_size: usize, max_age: Duration) -> Self {
        assert!(max_size > 0, "cache max_size must be non-zero");
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            max_size,
            max_age,
        }
    }

    /// Returns the cached value for `question`, or `None` on miss or expiry.
    ///
    /// A hit bumps the entry's recency; an expired entry is evicted.
    pub fn get(&self, question: &str) -> Option<V>
    where
        V: Clone,
    {
        let key = hash_question(question);
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(&key) {
            Some(entry) => entry.inserted_at.elapsed() > self.max_age,
            None => return None,
        };

        if expired {
            inner.entries.remove(&key);
            return None;
        }

        let tick = inner.next_tick();
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.last_used = tick;
            return Some(entry.value.clone());
        }
        None
    }

    /// Inserts a value for `question`, replacing any prior entry (and its
    /// timestamp) and evicting the least-recently-used entry if over
    /// capacity.
    pub fn insert(&self, question: &str, value: V) {
        let key = hash_question(question);
        let mut inner = self.inner.lock();

        let tick = inner.next_tick();
        inner.entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
                last_used: tick,
            },
        );

        if inner.entries.len() > self.max_size {
            inner.evict_lru();
        }
    }

    /// Returns `true` if a non-expired entry exists for `question`.
    ///
    /// Evicts the entry if it has expired. Does not bump recency.
    pub fn contains(&self, question: &str) -> bool {
        let key = hash_question(question);
        let mut inner = self.inner.lock();

        match inner.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() > self.max_age => {
                inner.entries.remove(&key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Removes the entry for `question`, returning its value if present.
    pub fn remove(&self, question: &str) -> Option<V> {
        let key = hash_question(question);
        self.inner.lock().entries.remove(&key).map(|e| e.value)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the configured TTL.
    #[inline]
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Returns current occupancy and capacity.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            max_size: self.max_size,
        }
    }
}

impl<V> std::fmt::Debug for QueryCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("size", &self.len())
            .field("max_size", &self.max_size)
            .field("max_age", &self.max_age)
            .finish()
    }
}

//! Insertion-ordered bounded cache shared by the image pipeline.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Default maximum number of entries per cache.
pub const DEFAULT_CACHE_SIZE: usize = 50;

/// Bounded associative store evicting the oldest insertions first.
///
/// Reads never reorder entries and replacing an existing key keeps its
/// original slot, so the backing LRU order is the insertion order.
/// Values are cloned out on read; store `Arc`s or `Bytes` for cheap
/// snapshots that callers cannot mutate in place.
pub struct BoundedCache<K, V> {
    name: &'static str,
    capacity: usize,
    entries: Mutex<LruCache<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            entries: Mutex::new(LruCache::unbounded()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a cache with [`DEFAULT_CACHE_SIZE`].
    #[must_use]
    pub fn with_default_capacity(name: &'static str) -> Self {
        Self::new(name, DEFAULT_CACHE_SIZE)
    }

    /// Cache name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Maximum number of entries kept after a trim.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a copy of the cached value.
    pub fn get(&self, key: &K) -> Option<V> {
        let value = self.entries.lock().peek(key).cloned();
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(cache = self.name, key = ?key, "Cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(cache = self.name, key = ?key, "Cache miss");
        }
        value
    }

    /// Stores a value, then trims the oldest entries past capacity.
    /// Last writer wins for an existing key.
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        if let Some(slot) = entries.peek_mut(&key) {
            *slot = value;
            return;
        }
        entries.push(key, value);
        let evicted = Self::trim_locked(&mut entries, self.capacity);
        if evicted > 0 {
            trace!(cache = self.name, evicted, "Trimmed cache on insert");
        }
    }

    /// Removes an entry.
    pub fn remove(&self, key: &K) -> Option<V> {
        let removed = self.entries.lock().pop(key);
        if removed.is_some() {
            debug!(cache = self.name, key = ?key, "Evicted cache entry");
        }
        removed
    }

    /// Evicts the oldest entries until the cache is within capacity.
    /// Returns the number of evicted entries.
    pub fn trim(&self) -> usize {
        let mut entries = self.entries.lock();
        Self::trim_locked(&mut entries, self.capacity)
    }

    fn trim_locked(entries: &mut LruCache<K, V>, capacity: usize) -> usize {
        let excess = entries.len().saturating_sub(capacity);
        for _ in 0..excess {
            entries.pop_lru();
        }
        excess
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
        debug!(cache = self.name, "Cleared cache");
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of entries.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

/// Type-erased view used by the sweeper.
pub trait SweepableCache: Send + Sync {
    /// Cache name used in logs.
    fn name(&self) -> &'static str;
    /// Trims to capacity and returns the number of evicted entries.
    fn sweep(&self) -> usize;
    /// Current number of entries.
    fn size(&self) -> usize;
}

impl<K, V> SweepableCache for BoundedCache<K, V>
where
    K: Hash + Eq + std::fmt::Debug + Send,
    V: Clone + Send,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn sweep(&self) -> usize {
        self.trim()
    }

    fn size(&self) -> usize {
        self.len()
    }
}

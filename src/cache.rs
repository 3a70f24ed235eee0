//! In-memory response cache with time-based invalidation
//!
//! Stores upstream response payloads keyed by the verbatim request
//! path+query and replays them while they are younger than the route's
//! TTL. Entries are never evicted individually: a stale entry stays in
//! the map (and in [`ResponseCache::stats`]) until it is overwritten by
//! a successful refresh or the whole cache is cleared.
//!
//! Concurrent misses on the same key are not deduplicated: each caller
//! invokes its own producer and the last successful write wins. Adding
//! single-flight would change the number of upstream calls, which is
//! observable behavior this layer deliberately preserves.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::Result;

/// Derive the cache key for a request from its path and raw query string.
///
/// The query string is used exactly as the client sent it — parameter
/// order is significant, so `?a=1&b=2` and `?b=2&a=1` produce distinct
/// keys and are cached separately. Keys are method-independent.
#[must_use]
pub fn cache_key(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}

/// Thread-safe TTL response cache
pub struct ResponseCache {
    /// Cache entries keyed by path+query
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Monotonic counter assigning each key its insertion slot
    next_seq: AtomicU64,
    /// Hit/miss accounting
    stats: CacheStats,
}

/// A cached payload with its write instant
struct CacheEntry {
    /// The cached JSON payload, replayed verbatim on a hit
    payload: Value,
    /// When this entry was written
    stored_at: Instant,
    /// Insertion slot, kept across overwrites of the same key
    seq: u64,
}

impl CacheEntry {
    /// An entry is fresh strictly below the TTL; at exactly `ttl` elapsed
    /// it is stale and treated as a miss.
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Cache statistics tracked atomically
#[derive(Debug)]
struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hit rate as a fraction (0.0-1.0)
    #[allow(clippy::cast_precision_loss)]
    fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

impl ResponseCache {
    /// Create a new empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            stats: CacheStats::new(),
        }
    }

    /// Get a cached payload if the entry exists and is younger than `ttl`.
    ///
    /// Returns `None` on a miss (absent or stale). A stale entry is left
    /// in place — it stays visible to [`Self::stats`] until a successful
    /// refresh overwrites it or the cache is cleared.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(ttl) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.payload.clone())
            }
            _ => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a payload under `key`, stamped with the current instant.
    ///
    /// A write replaces any previous entry for the key; the key keeps its
    /// original insertion slot in the [`Self::stats`] ordering.
    pub fn insert(&self, key: &str, payload: Value) {
        let mut entries = self.entries.write();
        let seq = entries
            .get(key)
            .map_or_else(|| self.next_seq.fetch_add(1, Ordering::Relaxed), |e| e.seq);
        entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                stored_at: Instant::now(),
                seq,
            },
        );
    }

    /// Serve `key` from memory, or invoke `producer` and capture its result.
    ///
    /// On a fresh hit the stored payload is returned immediately and the
    /// producer is not invoked; the entry's timestamp is not touched. On a
    /// miss the producer runs, and only a successful result is written back
    /// before being returned. A failed producer writes nothing and leaves
    /// any pre-existing stale entry undisturbed — errors are never cached
    /// and never masked with stale data.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(payload) = self.get(key, ttl) {
            debug!(key = %key, "Cache hit");
            return Ok(payload);
        }

        debug!(key = %key, "Cache miss");
        let payload = producer().await?;
        self.insert(key, payload.clone());
        Ok(payload)
    }

    /// Discard all entries, returning the cache to its empty initial state.
    ///
    /// Idempotent: clearing an already-empty cache is a no-op.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Snapshot the current cache state for diagnostics.
    ///
    /// Reports every stored key in insertion order, regardless of expiry
    /// state — an expired-but-not-yet-overwritten entry still counts.
    /// Never mutates the cache.
    pub fn stats(&self) -> CacheStatsSnapshot {
        let entries = self.entries.read();
        let mut keyed: Vec<(u64, &String)> = entries.iter().map(|(k, e)| (e.seq, k)).collect();
        keyed.sort_unstable_by_key(|(seq, _)| *seq);

        CacheStatsSnapshot {
            size: entries.len(),
            keys: keyed.into_iter().map(|(_, k)| k.clone()).collect(),
            hits: self.stats.hits(),
            misses: self.stats.misses(),
            hit_rate: self.stats.hit_rate(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of cache state and statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStatsSnapshot {
    /// Current number of entries (stale entries included)
    pub size: usize,
    /// All stored keys, in insertion order
    pub keys: Vec<String>,
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses
    pub misses: u64,
    /// Hit rate (0.0-1.0)
    pub hit_rate: f64,
}

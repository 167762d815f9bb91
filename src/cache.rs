//! Dispatch resolution caching.
//!
//! Resolving a transition means probing up to four scope keys across three
//! phases — a dozen map lookups — and applications tend to bounce between the
//! same handful of endpoint pairs. [`ResolveCache`] memoizes the assembled,
//! phase-ordered chain list per composite transition key. It is gated behind
//! the `cache` feature flag and uses the [`lru`] crate internally.
//!
//! The cache is cleared on every middleware registration (the only event
//! that can make a new chain eligible for a key). Deregistration does not
//! clear it: a handle can only *empty* a chain that is already in a cached
//! list, and empty chains forward straight to their successor, so a stale
//! entry stays behaviorally correct.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations so cache
//! effectiveness can be observed at runtime.

use crate::chain::Chain;
use crate::transition::Transition;
use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: usize,
    /// Number of cache misses.
    pub misses: usize,
    /// Number of full invalidations (one per middleware registration).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU memo of assembled chain lists, keyed by composite transition key.
pub struct ResolveCache {
    entries: LruCache<String, Vec<Chain<Transition>>>,
    stats: CacheStats,
}

impl ResolveCache {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a cache with the default capacity (64 transition keys).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).expect("Cache capacity must be non-zero");
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the chain list for a composite key.
    pub fn get(&mut self, key: &str) -> Option<Vec<Chain<Transition>>> {
        match self.entries.get(key) {
            Some(chains) => {
                self.stats.hits += 1;
                trace_log!("Resolve cache hit for '{}'", key);
                Some(chains.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store the chain list assembled for a composite key.
    pub fn insert(&mut self, key: String, chains: Vec<Chain<Transition>>) {
        self.entries.put(key, chains);
    }

    /// Drop every entry. Called on each middleware registration.
    pub fn clear(&mut self) {
        self.stats.invalidations += 1;
        self.entries.clear();
    }

    /// Current counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResolveCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveCache")
            .field("len", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

use crate::cache::LinkCache;
use crate::fifo::FifoMap;
use linkhop_core::{Clock, ShortCode, SystemClock};
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default maximum number of entries held by a [`BoundedCache`].
pub const DEFAULT_MAX_ENTRIES: usize = 50_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    long_url: String,
    expires_at_ms: i64,
}

impl CacheEntry {
    fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms < now_ms
    }
}

/// A capacity-bounded in-memory link cache with FIFO eviction.
///
/// Expiry is enforced lazily: [`LinkCache::get`] drops an expired entry when
/// it finds one. There is no background timer; [`BoundedCache::purge_expired`]
/// is available for callers that want to bound staleness separately.
///
/// One mutex guards the whole map, so every lookup-then-delete and
/// insert-then-evict sequence is atomic.
pub struct BoundedCache {
    entries: Mutex<FifoMap<ShortCode, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl BoundedCache {
    /// Creates a cache holding at most `max_entries` links, using the system clock.
    pub fn new(max_entries: NonZeroUsize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Creates a cache with a custom [`Clock`].
    ///
    /// This is primarily useful for testing expiry deterministically.
    pub fn with_clock(max_entries: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(FifoMap::new(max_entries)),
            clock,
        }
    }

    /// Maximum number of entries the cache can hold.
    pub fn capacity(&self) -> usize {
        self.entries.lock().capacity()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now_ms = self.clock.now_ms();
        let removed = self
            .entries
            .lock()
            .retain(|_, entry| !entry.is_expired(now_ms));
        if removed > 0 {
            debug!(removed, "Purged expired cache entries");
        }
        removed
    }
}

impl Default for BoundedCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_MAX_ENTRIES).unwrap_or(NonZeroUsize::MIN))
    }
}

impl std::fmt::Debug for BoundedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("BoundedCache")
            .field("len", &entries.len())
            .field("capacity", &entries.capacity())
            .finish()
    }
}

impl LinkCache for BoundedCache {
    fn get(&self, code: &ShortCode) -> Option<String> {
        let now_ms = self.clock.now_ms();
        let mut entries = self.entries.lock();

        let Some(entry) = entries.get(code) else {
            trace!(code = %code, "Cache miss");
            return None;
        };

        if entry.is_expired(now_ms) {
            entries.remove(code);
            debug!(code = %code, "Dropped expired cache entry");
            return None;
        }

        trace!(code = %code, "Cache hit");
        Some(entry.long_url.clone())
    }

    fn set(&self, code: &ShortCode, long_url: &str, expires_at_ms: i64) {
        let evicted = self.entries.lock().insert(
            code.clone(),
            CacheEntry {
                long_url: long_url.to_owned(),
                expires_at_ms,
            },
        );
        if evicted > 0 {
            trace!(code = %code, evicted, "Evicted oldest cache entries");
        }
    }

    fn clear(&self) {
        self.entries.lock().clear();
        debug!("Cleared link cache");
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

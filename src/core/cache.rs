//! Generic TTL cache for request/response memoization.
//!
//! Entries expire `ttl_seconds` after the write that produced them.
//! Expiry is enforced on read (a `get` at or past the deadline is a
//! miss and evicts the entry) and by `clear_expired`, which is run
//! as a best-effort background sweep after cache mutations. Reads
//! never depend on the sweep having run.
//!
//! There is no capacity bound; growth between sweeps is bounded only
//! by the TTLs of what was written.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Key-value store with per-entry expiry
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value, overwriting any existing entry (value and expiry)
    pub fn set(&self, key: &str, value: V, ttl_seconds: u64) {
        self.set_at(key, value, ttl_seconds, Instant::now());
    }

    /// Return the value for `key`, or `None` if absent or expired
    ///
    /// An expired entry is evicted on the spot. Hits do not refresh
    /// the expiry (no sliding TTL).
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Evict every entry whose deadline has passed
    pub fn clear_expired(&self) {
        self.clear_expired_at(Instant::now());
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set_at(&self, key: &str, value: V, ttl_seconds: u64, now: Instant) {
        let entry = CacheEntry {
            value,
            expires_at: now + Duration::from_secs(ttl_seconds),
        };
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), entry);
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn clear_expired_at(&self, now: Instant) {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .retain(|_, entry| entry.expires_at > now);
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

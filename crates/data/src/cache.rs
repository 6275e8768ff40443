//! In-memory cache with time-based expiry.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_ms: u64,
}

/// Key-value cache whose entries expire `ttl` after insertion.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    entries: HashMap<K, Entry<V>>,
    ttl: Duration,
    clock: C,
}

impl<K: Eq + Hash, V> TtlCache<K, V, SystemClock> {
    /// Creates a cache on the wall clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K: Eq + Hash, V, C: Clock> TtlCache<K, V, C> {
    /// Creates a cache on the given clock.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    fn is_fresh(&self, entry: &Entry<V>) -> bool {
        let age = self.clock.now_ms().saturating_sub(entry.inserted_ms);
        u128::from(age) < self.ttl.as_millis()
    }

    /// Returns the value for `key` unless it has expired.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| &entry.value)
    }

    /// Inserts or replaces a value, restarting its TTL.
    pub fn set(&mut self, key: K, value: V) {
        let inserted_ms = self.clock.now_ms();
        self.entries.insert(key, Entry { value, inserted_ms });
    }

    /// Removes a value, returning it if it was still fresh.
    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.is_fresh(&entry).then_some(entry.value)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops expired entries.
    pub fn purge_expired(&mut self) {
        let now = self.clock.now_ms();
        let ttl = self.ttl.as_millis();
        self.entries
            .retain(|_, entry| u128::from(now.saturating_sub(entry.inserted_ms)) < ttl);
    }

    /// Number of fresh entries.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| self.is_fresh(e)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_secs: u64) -> (Arc<ManualClock>, TtlCache<String, u32, Arc<ManualClock>>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let cache = TtlCache::with_clock(Duration::from_secs(ttl_secs), clock.clone());
        (clock, cache)
    }

    #[test]
    fn test_get_before_expiry() {
        let (clock, mut cache) = cache(60);
        cache.set("SUI".to_string(), 9);
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"SUI".to_string()), Some(&9));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expires_at_ttl() {
        let (clock, mut cache) = cache(60);
        cache.set("SUI".to_string(), 9);
        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get(&"SUI".to_string()), None);
        assert!(cache.is_empty());

        cache.purge_expired();
        assert_eq!(cache.invalidate(&"SUI".to_string()), None);
    }

    #[test]
    fn test_set_restarts_ttl() {
        let (clock, mut cache) = cache(60);
        cache.set("USDC".to_string(), 6);
        clock.advance(Duration::from_secs(50));
        cache.set("USDC".to_string(), 6);
        clock.advance(Duration::from_secs(50));
        assert_eq!(cache.get(&"USDC".to_string()), Some(&6));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let (_clock, mut cache) = cache(60);
        cache.set("A".to_string(), 1);
        cache.set("B".to_string(), 2);
        assert_eq!(cache.invalidate(&"A".to_string()), Some(1));
        assert_eq!(cache.get(&"A".to_string()), None);
        cache.clear();
        assert!(cache.is_empty());
    }
}

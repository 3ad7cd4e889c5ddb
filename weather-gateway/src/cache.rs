use crate::clock::Clock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Composite cache key: request kind plus the city name as given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey<'a> {
    Current(&'a str),
    Forecast(&'a str),
}

impl fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Current(city) => write!(f, "current_{}", city),
            CacheKey::Forecast(city) => write!(f, "forecast_{}", city),
        }
    }
}

struct CacheEntry<V> {
    data: V,
    stored_at: i64,
}

/// Key-value store whose entries count as absent once they are older than
/// the TTL. Stale entries stay in the map until the next write for that key.
pub struct ExpiringCache<V> {
    cache: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let cache = self.cache.read().await;
        let now = self.clock.now_millis();
        if let Some(entry) = cache.get(key)
            && now - entry.stored_at < self.ttl_millis
        {
            return Some(entry.data.clone());
        }
        None
    }

    pub async fn set(&self, key: String, data: V) {
        let stored_at = self.clock.now_millis();
        let mut cache = self.cache.write().await;
        cache.insert(key, CacheEntry { data, stored_at });
    }

    /// Number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn cache_with_clock() -> (ExpiringCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let cache = ExpiringCache::new(Duration::from_secs(60), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(CacheKey::Current("London").to_string(), "current_London");
        assert_eq!(CacheKey::Forecast("New York").to_string(), "forecast_New York");
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("current_London".to_string(), "sunny".to_string()).await;

        clock.advance(Duration::from_millis(59_999));
        assert_eq!(cache.get("current_London").await.as_deref(), Some("sunny"));
    }

    #[tokio::test]
    async fn test_expires_at_exactly_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("current_London".to_string(), "sunny".to_string()).await;

        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get("current_London").await, None);
    }

    #[tokio::test]
    async fn test_stale_entry_kept_until_overwritten() {
        let (cache, clock) = cache_with_clock();
        cache.set("forecast_Tokyo".to_string(), "old".to_string()).await;
        clock.advance(Duration::from_secs(120));

        assert_eq!(cache.get("forecast_Tokyo").await, None);
        assert_eq!(cache.len().await, 1);

        cache.set("forecast_Tokyo".to_string(), "new".to_string()).await;
        assert_eq!(cache.get("forecast_Tokyo").await.as_deref(), Some("new"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let (cache, _clock) = cache_with_clock();
        assert!(cache.is_empty().await);
        assert_eq!(cache.get("current_Paris").await, None);
    }
}

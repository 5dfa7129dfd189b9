//! Translation result cache.
//!
//! The cache is a shared key-value service with no transactional coupling to
//! the store. Callers treat every operation as best effort.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

#[async_trait]
pub trait TranslationCache: Send + Sync {
    /// Cached value for `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.stored_at.elapsed() > ttl)
    }
}

/// Shared in-process cache with optional expiry.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Option<Duration>,
}

impl MemoryCache {
    /// Cache whose entries never expire
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose entries expire `ttl` after being stored
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Number of entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Drop expired entries, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl));
        before - entries.len()
    }
}

#[async_trait]
impl TranslationCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("Translation cache lock poisoned"))?;

        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("Translation cache lock poisoned"))?;

        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }
}

/// Cache that stores nothing; every read misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

#[async_trait]
impl TranslationCache for NullCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("Article:1:fr:title").await.expect("get"), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("k", "Bonjour").await.expect("set");
        assert_eq!(cache.get("k").await.expect("get").as_deref(), Some("Bonjour"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", "old").await.expect("set");
        cache.set("k", "new").await.expect("set");
        assert_eq!(cache.get("k").await.expect("get").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_value_is_stored() {
        let cache = MemoryCache::new();
        cache.set("k", "").await.expect("set");
        assert_eq!(cache.get("k").await.expect("get").as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = MemoryCache::with_ttl(Duration::from_millis(20));
        cache.set("k", "v").await.expect("set");
        assert!(cache.get("k").await.expect("get").is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(cache.get("k").await.expect("get").is_none());
        assert_eq!(cache.cleanup_expired(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_no_ttl_never_expires() {
        let cache = MemoryCache::new();
        assert!(cache.ttl().is_none());
        cache.set("k", "v").await.expect("set");
        assert_eq!(cache.cleanup_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();
        cache.set("a", "1").await.expect("set");
        cache.set("b", "2").await.expect("set");
        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_null_cache_never_hits() {
        let cache = NullCache;
        cache.set("k", "v").await.expect("set");
        assert_eq!(cache.get("k").await.expect("get"), None);
    }
}

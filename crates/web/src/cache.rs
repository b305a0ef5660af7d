use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CachedPage {
    text: String,
    stored_at: Instant,
}

/// Extracted portal text keyed by URL, shared across requests.
#[derive(Clone)]
pub struct PageCache {
    pages: Arc<DashMap<String, CachedPage>>,
    ttl: Duration,
    max_entries: usize,
}

impl PageCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            pages: Arc::new(DashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn get(&self, url: &str) -> Option<String> {
        let key = self.hash_url(url);
        let hit = self.pages.get(&key).and_then(|entry| {
            (entry.stored_at.elapsed() < self.ttl).then(|| entry.text.clone())
        });

        if hit.is_none() {
            self.pages.remove_if(&key, |_, page| page.stored_at.elapsed() >= self.ttl);
        }
        hit
    }

    pub fn insert(&self, url: &str, text: String) {
        if self.pages.len() >= self.max_entries {
            self.evict();
        }
        let key = self.hash_url(url);
        self.pages.insert(
            key,
            CachedPage {
                text,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop expired pages; if that frees nothing, drop a quarter of the cache.
    fn evict(&self) {
        let ttl = self.ttl;
        self.pages.retain(|_, page| page.stored_at.elapsed() < ttl);

        if self.pages.len() >= self.max_entries {
            let to_remove: Vec<_> = self
                .pages
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.pages.remove(&key);
            }
        }
    }

    fn hash_url(&self, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            pages_cached: self.pages.len(),
            ttl_secs: self.ttl.as_secs(),
        }
    }

    pub fn clear(&self) {
        self.pages.clear();
    }
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub pages_cached: usize,
    pub ttl_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = PageCache::new(Duration::from_secs(60), 8);
        cache.insert("https://cic.gov.in/", "commission text".to_string());

        assert_eq!(cache.get("https://cic.gov.in/").as_deref(), Some("commission text"));
        assert_eq!(cache.get("https://nalsa.gov.in/"), None);
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = PageCache::new(Duration::ZERO, 8);
        cache.insert("https://cic.gov.in/", "stale".to_string());

        assert_eq!(cache.get("https://cic.gov.in/"), None);
        assert_eq!(cache.stats().pages_cached, 0);
    }

    #[test]
    fn test_bounded_size() {
        let cache = PageCache::new(Duration::from_secs(60), 4);
        for i in 0..10 {
            cache.insert(&format!("https://portal{}.gov.in/", i), "text".to_string());
        }
        assert!(cache.stats().pages_cached <= 4);

        cache.clear();
        assert_eq!(cache.stats().pages_cached, 0);
    }
}

//! Caching module for arxiv-digest
//!
//! Term links and finished digests are expensive (remote lookups, model
//! inference), so both are kept for a while keyed by what produced them.

use crate::summarize::Digest;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Cache for term → encyclopedia link, including negative results
#[derive(Clone)]
pub struct LinkCache {
    cache: Cache<String, Option<String>>,
}

impl LinkCache {
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    /// Outer `None` means not cached; inner `None` means known to have no link
    pub async fn get(&self, term: &str) -> Option<Option<String>> {
        self.cache.get(term).await
    }

    pub async fn set(&self, term: String, link: Option<String>) {
        self.cache.insert(term, link).await;
    }
}

impl Default for LinkCache {
    fn default() -> Self {
        Self::new(3600, 1000)
    }
}

/// Cache for processed articles
#[derive(Clone)]
pub struct DigestCache {
    cache: Cache<String, Arc<Digest>>,
}

impl DigestCache {
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    pub async fn get(&self, id: &str, summarized: bool) -> Option<Arc<Digest>> {
        self.cache.get(&digest_key(id, summarized)).await
    }

    pub async fn set(&self, id: &str, summarized: bool, digest: Arc<Digest>) {
        self.cache.insert(digest_key(id, summarized), digest).await;
    }
}

impl Default for DigestCache {
    fn default() -> Self {
        Self::new(3600, 1000)
    }
}

fn digest_key(id: &str, summarized: bool) -> String {
    format!("{}:{}", id, if summarized { "summary" } else { "text" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_link_cache_negative_entries() {
        let cache = LinkCache::new(60, 100);
        assert_eq!(cache.get("ai").await, None);

        cache.set("ai".to_string(), None).await;
        assert_eq!(cache.get("ai").await, Some(None));

        cache
            .set("ml".to_string(), Some("https://en.wikipedia.org/wiki/ML".to_string()))
            .await;
        assert_eq!(
            cache.get("ml").await,
            Some(Some("https://en.wikipedia.org/wiki/ML".to_string()))
        );
    }

    #[test]
    fn test_digest_key() {
        assert_eq!(digest_key("2101.00001v1", true), "2101.00001v1:summary");
        assert_eq!(digest_key("2101.00001v1", false), "2101.00001v1:text");
    }
}

//! In-Memory TTL Feed Cache Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::ports::{sanitize_cache_key, CacheError, CacheStats, FeedCachePort};

#[derive(Debug, Clone)]
struct CachedFeed {
    content: String,
    stored_at: Instant,
}

/// 内存 Feed 缓存
#[derive(Default)]
pub struct InMemoryFeedCache {
    entries: DashMap<String, CachedFeed>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    expired_count: AtomicU64,
}

impl InMemoryFeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl FeedCachePort for InMemoryFeedCache {
    async fn get(&self, key: &str, max_age: Duration) -> Result<Option<String>, CacheError> {
        let key = sanitize_cache_key(key);

        // 读引用必须在 remove 之前释放
        let fresh = match self.entries.get(&key) {
            None => None,
            Some(entry) if entry.stored_at.elapsed() > max_age => Some(None),
            Some(entry) => Some(Some(entry.content.clone())),
        };

        match fresh {
            Some(Some(content)) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Ok(Some(content))
            }
            Some(None) => {
                self.entries.remove(&key);
                self.expired_count.fetch_add(1, Ordering::Relaxed);
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Cache entry expired");
                Ok(None)
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, content: &str) -> Result<(), CacheError> {
        self.entries.insert(
            sanitize_cache_key(key),
            CachedFeed {
                content: content.to_string(),
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(&sanitize_cache_key(key));
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            expired_count: self.expired_count.load(Ordering::Relaxed),
        }
    }
}

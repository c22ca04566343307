//! Sled-based TTL Feed Cache Implementation

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::application::ports::{sanitize_cache_key, CacheError, CacheStats, FeedCachePort};

const KEY_PREFIX: &str = "feed:";

/// Sled 缓存配置
#[derive(Debug, Clone)]
pub struct SledCacheConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledCacheConfig {
    fn default() -> Self {
        Self {
            db_path: "data/feed_cache.sled".to_string(),
        }
    }
}

/// 内部缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InternalCacheEntry {
    content: String,
    /// 写入时间（毫秒时间戳）
    created_at: i64,
}

impl InternalCacheEntry {
    fn is_expired(&self, now_ms: i64, max_age: Duration) -> bool {
        let age_ms = now_ms.saturating_sub(self.created_at).max(0) as u128;
        age_ms > max_age.as_millis()
    }
}

/// Sled Feed 缓存
pub struct SledFeedCache {
    db: Db,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    expired_count: AtomicU64,
}

impl SledFeedCache {
    /// 创建新的缓存实例
    pub fn new(config: &SledCacheConfig) -> Result<Self, CacheError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            entries = db.scan_prefix(KEY_PREFIX).count(),
            "SledFeedCache initialized"
        );

        Ok(Self {
            db,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        })
    }

    /// 打开现有缓存
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let config = SledCacheConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    fn db_key(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, sanitize_cache_key(key))
    }

    fn insert_entry(&self, key: &str, entry: &InternalCacheEntry) -> Result<(), CacheError> {
        let entry_bytes =
            bincode::serialize(entry).map_err(|e| CacheError::SerializationError(e.to_string()))?;
        self.db
            .insert(Self::db_key(key), entry_bytes)
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn record_miss(&self) -> Option<String> {
        self.miss_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db
            .flush()
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl FeedCachePort for SledFeedCache {
    async fn get(&self, key: &str, max_age: Duration) -> Result<Option<String>, CacheError> {
        let db_key = Self::db_key(key);

        let data = match self.db.get(&db_key) {
            Ok(Some(data)) => data,
            Ok(None) => return Ok(self.record_miss()),
            Err(e) => return Err(CacheError::DatabaseError(e.to_string())),
        };

        let entry = match bincode::deserialize::<InternalCacheEntry>(&data) {
            Ok(entry) => entry,
            Err(e) => {
                // 损坏的条目直接删除
                tracing::warn!(key = %db_key, error = %e, "Dropping unreadable cache entry");
                self.db
                    .remove(&db_key)
                    .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
                return Ok(self.record_miss());
            }
        };

        if entry.is_expired(Utc::now().timestamp_millis(), max_age) {
            self.db
                .remove(&db_key)
                .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
            self.expired_count.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %db_key, "Cache entry expired");
            return Ok(self.record_miss());
        }

        self.hit_count.fetch_add(1, Ordering::Relaxed);
        Ok(Some(entry.content))
    }

    async fn put(&self, key: &str, content: &str) -> Result<(), CacheError> {
        let entry = InternalCacheEntry {
            content: content.to_string(),
            created_at: Utc::now().timestamp_millis(),
        };
        self.insert_entry(key, &entry)?;

        tracing::debug!(
            key = %key,
            size_bytes = content.len(),
            "Feed cached"
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.db
            .remove(Self::db_key(key))
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.db.scan_prefix(KEY_PREFIX).count(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            expired_count: self.expired_count.load(Ordering::Relaxed),
        }
    }
}

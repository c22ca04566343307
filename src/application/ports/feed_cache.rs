//! Feed Cache Port - 已渲染 Feed 的 TTL 缓存
//!
//! 具体实现使用 Sled（持久化）或 DashMap（内存）

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Feed Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub expired_count: u64,
}

/// Feed Cache Port
#[async_trait]
pub trait FeedCachePort: Send + Sync {
    /// 读取缓存
    ///
    /// 条目存在时间超过 max_age 时删除并返回 None
    async fn get(&self, key: &str, max_age: Duration) -> Result<Option<String>, CacheError>;

    /// 写入缓存（覆盖旧值，刷新时间戳）
    async fn put(&self, key: &str, content: &str) -> Result<(), CacheError>;

    /// 删除缓存条目
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// 获取缓存统计信息
    async fn stats(&self) -> CacheStats;
}

/// 缓存 key 清洗：只保留字母数字、`_` 和 `-`
pub fn sanitize_cache_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

/// Feed 缓存 key，例如 `weekly_diaspora`
pub fn feed_cache_key(kind: &str, location: &str) -> String {
    sanitize_cache_key(&format!("{}_{}", kind, location))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_cache_key() {
        assert_eq!(sanitize_cache_key("weekly_diaspora"), "weekly_diaspora");
        assert_eq!(sanitize_cache_key("../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_cache_key("daily israel!"), "dailyisrael");
    }

    #[test]
    fn test_cache_error_kinds() {
        // 只有编码失败与存储失败两类
        fn kind(err: &CacheError) -> &'static str {
            match err {
                CacheError::SerializationError(_) => "serialization",
                CacheError::DatabaseError(_) => "database",
            }
        }

        let err = CacheError::DatabaseError("io failure".into());
        assert_eq!(kind(&err), "database");
        assert_eq!(err.to_string(), "Database error: io failure");
        assert_eq!(kind(&CacheError::SerializationError("eof".into())), "serialization");
    }

    #[test]
    fn test_feed_cache_key() {
        assert_eq!(feed_cache_key("daily", "israel"), "daily_israel");
    }
}

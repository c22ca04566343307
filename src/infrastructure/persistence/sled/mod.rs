//! Sled 存储实现

mod feed_cache;

pub use feed_cache::{SledCacheConfig, SledFeedCache};

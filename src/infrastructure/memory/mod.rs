//! Memory Layer - In-Memory State Management
//!
//! 进程内 Feed 缓存，重启后丢失

mod feed_cache;

pub use feed_cache::InMemoryFeedCache;

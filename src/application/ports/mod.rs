//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod calendar;
mod feed_cache;
mod scripture_source;

pub use calendar::{CalendarError, CalendarPort, CurrentPortion};
pub use feed_cache::{feed_cache_key, sanitize_cache_key, CacheError, CacheStats, FeedCachePort};
pub use scripture_source::{ScriptureError, ScripturePassage, ScripturePort};

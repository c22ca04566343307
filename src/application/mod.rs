//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Calendar、Scripture、FeedCache）
//! - queries: 查询及处理器
//! - stats: 降级计数
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod queries;
pub mod stats;

pub use error::ApplicationError;

pub use ports::{
    // Calendar
    CalendarError,
    CalendarPort,
    CurrentPortion,
    // Scripture
    ScriptureError,
    ScripturePassage,
    ScripturePort,
    // Feed cache
    feed_cache_key,
    CacheError,
    CacheStats,
    FeedCachePort,
};

pub use queries::{
    GetDailyFeed,
    GetPortion,
    GetSchedule,
    GetWeeklyFeed,
    // Handlers
    handlers::{
        resolve_current_index, CurrentPortionResolver, DailyFeed, DailyFeedItem,
        GetDailyFeedHandler, GetPortionHandler, GetScheduleHandler, GetWeeklyFeedHandler,
        LoadedPassage, PassageLoader, PortionResponse, WeeklyFeed, WeeklyFeedItem,
    },
};

pub use stats::{FeedStats, FeedStatsSnapshot};

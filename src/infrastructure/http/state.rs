//! Application State
//!
//! 包含所有端口与 Query Handlers 的应用状态

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    // Query handlers
    CurrentPortionResolver, GetDailyFeedHandler, GetPortionHandler, GetScheduleHandler,
    GetWeeklyFeedHandler, PassageLoader,
    // Ports
    CalendarPort, FeedCachePort, ScripturePort,
    // Stats
    FeedStats,
};
use crate::domain::FallbackPolicy;
use crate::infrastructure::rss::RssRenderer;

/// Feed 生成参数
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// 每周 Feed 包含的周数
    pub weekly_weeks: usize,
    /// 每日 Feed 包含的周数
    pub daily_weeks: usize,
    /// 每周 Feed 缓存有效期
    pub weekly_ttl: Duration,
    /// 每日 Feed 缓存有效期
    pub daily_ttl: Duration,
    /// 当前 parasha 无法确定时的回退策略
    pub fallback: FallbackPolicy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            weekly_weeks: 8,
            daily_weeks: 4,
            weekly_ttl: Duration::from_secs(6 * 3600),
            daily_ttl: Duration::from_secs(2 * 3600),
            fallback: FallbackPolicy::CycleStart,
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub calendar: Arc<dyn CalendarPort>,
    pub scripture: Arc<dyn ScripturePort>,
    /// 缓存关闭时为 None
    pub feed_cache: Option<Arc<dyn FeedCachePort>>,
    pub stats: Arc<FeedStats>,

    // ========== Rendering ==========
    pub renderer: RssRenderer,
    pub settings: FeedSettings,

    // ========== Query Handlers ==========
    pub weekly_feed_handler: GetWeeklyFeedHandler,
    pub daily_feed_handler: GetDailyFeedHandler,
    pub schedule_handler: GetScheduleHandler,
    pub portion_handler: GetPortionHandler,

    /// 固定时间（测试用），None 时使用系统时间
    fixed_now: Option<DateTime<Utc>>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        calendar: Arc<dyn CalendarPort>,
        scripture: Arc<dyn ScripturePort>,
        feed_cache: Option<Arc<dyn FeedCachePort>>,
        settings: FeedSettings,
        base_url: impl Into<String>,
    ) -> Self {
        let stats = Arc::new(FeedStats::new());
        let current =
            CurrentPortionResolver::new(calendar.clone(), stats.clone(), settings.fallback);
        let loader = PassageLoader::new(scripture.clone(), stats.clone());

        Self {
            // Ports
            calendar,
            scripture,
            feed_cache,
            stats: stats.clone(),

            // Rendering
            renderer: RssRenderer::new(base_url),
            settings,

            // Query handlers
            weekly_feed_handler: GetWeeklyFeedHandler::new(
                current.clone(),
                loader.clone(),
                stats.clone(),
            ),
            daily_feed_handler: GetDailyFeedHandler::new(current.clone(), loader, stats),
            schedule_handler: GetScheduleHandler::new(current),
            portion_handler: GetPortionHandler::new(),

            fixed_now: None,
        }
    }

    /// 固定当前时间
    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

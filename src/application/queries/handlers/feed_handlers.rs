//! Feed Query Handlers
//!
//! 流程：确定当前 parasha → 生成日程 → 并发获取经文 → 提取范围 → （每日）分段

use chrono::{Duration, NaiveDate};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ScripturePort;
use crate::application::queries::{GetDailyFeed, GetWeeklyFeed};
use crate::application::stats::FeedStats;
use crate::domain::{
    extract_with_status, generate_from, partition_default, DailySegment, ExtractionStatus,
    Location, PortionCycle, ReferenceResolver, ScheduleEntry, ScriptureReference, ScriptureText,
    CYCLE_LENGTH,
};

use super::schedule_handlers::CurrentPortionResolver;

/// 单个 Feed 允许的最大周数（一个完整循环）
pub const MAX_FEED_WEEKS: usize = CYCLE_LENGTH;

/// 同时进行的经文请求上限
pub const MAX_CONCURRENT_FETCHES: usize = 4;

// ============================================================================
// Response DTOs
// ============================================================================

/// 已提取的经文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPassage {
    pub text: ScriptureText,
    pub status: ExtractionStatus,
    pub version: Option<String>,
    pub source_url: Option<String>,
}

/// 每周 Feed 条目
#[derive(Debug, Clone)]
pub struct WeeklyFeedItem {
    pub entry: ScheduleEntry,
    /// 获取失败时为 None，条目仍然保留
    pub passage: Option<LoadedPassage>,
}

/// 每周 Feed
#[derive(Debug, Clone)]
pub struct WeeklyFeed {
    pub location: Location,
    pub today: NaiveDate,
    pub items: Vec<WeeklyFeedItem>,
}

/// 每日 Feed 条目
#[derive(Debug, Clone)]
pub struct DailyFeedItem {
    pub date: NaiveDate,
    pub reference: ScriptureReference,
    pub segment: DailySegment,
    pub text_available: bool,
}

/// 每日 Feed
#[derive(Debug, Clone)]
pub struct DailyFeed {
    pub location: Location,
    pub today: NaiveDate,
    pub items: Vec<DailyFeedItem>,
}

// ============================================================================
// Passage loading
// ============================================================================

/// 经文加载器：获取、提取并记录降级
#[derive(Clone)]
pub struct PassageLoader {
    scripture: Arc<dyn ScripturePort>,
    stats: Arc<FeedStats>,
}

impl PassageLoader {
    pub fn new(scripture: Arc<dyn ScripturePort>, stats: Arc<FeedStats>) -> Self {
        Self { scripture, stats }
    }

    /// 获取单个条目的经文，失败时返回 None
    pub async fn load(&self, entry: &ScheduleEntry) -> Option<LoadedPassage> {
        let passage = match self.scripture.fetch_text(&entry.reference).await {
            Ok(passage) => passage,
            Err(e) => {
                self.stats.record_fetch_failure();
                tracing::warn!(
                    portion = %entry.portion_name,
                    reference = %entry.reference,
                    error = %e,
                    "Scripture fetch failed, item will have no text"
                );
                return None;
            }
        };

        let extraction = extract_with_status(&passage.text, &entry.reference);
        self.stats.record_extraction(extraction.status);
        match extraction.status {
            ExtractionStatus::Complete => {}
            ExtractionStatus::Truncated {
                missing_chapters,
                short_chapters,
            } => {
                tracing::warn!(
                    portion = %entry.portion_name,
                    reference = %entry.reference,
                    missing_chapters,
                    short_chapters,
                    verses = extraction.text.verse_count(),
                    "Upstream text truncated, using partial passage"
                );
            }
            ExtractionStatus::Unfiltered => {
                tracing::warn!(
                    portion = %entry.portion_name,
                    reference = %entry.reference,
                    "No verses in range, using unfiltered upstream text"
                );
            }
        }

        Some(LoadedPassage {
            text: extraction.text,
            status: extraction.status,
            version: passage.version,
            source_url: passage.source_url,
        })
    }

    /// 并发获取所有条目（最多 `MAX_CONCURRENT_FETCHES` 个同时进行），结果顺序与输入一致
    pub async fn load_all(&self, entries: &[ScheduleEntry]) -> Vec<Option<LoadedPassage>> {
        let futures: Vec<_> = entries.iter().map(|entry| self.load(entry)).collect();
        stream::iter(futures)
            .buffered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await
    }
}

async fn schedule_for(
    current: &CurrentPortionResolver,
    location: Location,
    today: NaiveDate,
    weeks: usize,
) -> Result<Vec<ScheduleEntry>, ApplicationError> {
    let position = current.current_position(location, today).await?;
    Ok(generate_from(
        PortionCycle::standard(),
        &ReferenceResolver::default(),
        position,
        today,
        weeks,
    )?)
}

fn validate_weeks(weeks: usize) -> Result<(), ApplicationError> {
    if weeks == 0 || weeks > MAX_FEED_WEEKS {
        return Err(ApplicationError::validation(format!(
            "weeks must be between 1 and {}, got {}",
            MAX_FEED_WEEKS, weeks
        )));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// GetWeeklyFeed Handler
pub struct GetWeeklyFeedHandler {
    current: CurrentPortionResolver,
    loader: PassageLoader,
    stats: Arc<FeedStats>,
}

impl GetWeeklyFeedHandler {
    pub fn new(current: CurrentPortionResolver, loader: PassageLoader, stats: Arc<FeedStats>) -> Self {
        Self {
            current,
            loader,
            stats,
        }
    }

    pub async fn handle(&self, query: GetWeeklyFeed) -> Result<WeeklyFeed, ApplicationError> {
        validate_weeks(query.weeks)?;

        let entries = schedule_for(&self.current, query.location, query.today, query.weeks).await?;
        let passages = self.loader.load_all(&entries).await;

        let items: Vec<WeeklyFeedItem> = entries
            .into_iter()
            .zip(passages)
            .map(|(entry, passage)| WeeklyFeedItem { entry, passage })
            .collect();

        self.stats.record_feed_generated();
        tracing::info!(
            location = %query.location,
            items = items.len(),
            with_text = items.iter().filter(|i| i.passage.is_some()).count(),
            "Weekly feed generated"
        );

        Ok(WeeklyFeed {
            location: query.location,
            today: query.today,
            items,
        })
    }
}

/// GetDailyFeed Handler
pub struct GetDailyFeedHandler {
    current: CurrentPortionResolver,
    loader: PassageLoader,
    stats: Arc<FeedStats>,
}

impl GetDailyFeedHandler {
    pub fn new(current: CurrentPortionResolver, loader: PassageLoader, stats: Arc<FeedStats>) -> Self {
        Self {
            current,
            loader,
            stats,
        }
    }

    pub async fn handle(&self, query: GetDailyFeed) -> Result<DailyFeed, ApplicationError> {
        validate_weeks(query.weeks)?;

        let entries = schedule_for(&self.current, query.location, query.today, query.weeks).await?;
        let passages = self.loader.load_all(&entries).await;

        let mut items = Vec::with_capacity(entries.len() * 7);
        for (entry, passage) in entries.iter().zip(passages) {
            let text_available = passage.is_some();
            let text = passage.map(|p| p.text).unwrap_or_default();
            let week_start = entry.week_start();

            for segment in partition_default(&text, &entry.portion_name) {
                items.push(DailyFeedItem {
                    date: week_start + Duration::days(segment.day_index as i64 - 1),
                    reference: entry.reference.clone(),
                    segment,
                    text_available,
                });
            }
        }

        self.stats.record_feed_generated();
        tracing::info!(
            location = %query.location,
            weeks = entries.len(),
            items = items.len(),
            "Daily feed generated"
        );

        Ok(DailyFeed {
            location: query.location,
            today: query.today,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FallbackPolicy;
    use crate::application::ports::{ScriptureError, ScripturePassage};
    use crate::infrastructure::adapters::{StaticCalendar, StaticScripture};
    use async_trait::async_trait;
    use chrono::Datelike;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn handlers(
        calendar: StaticCalendar,
        scripture: StaticScripture,
    ) -> (GetWeeklyFeedHandler, GetDailyFeedHandler, Arc<FeedStats>) {
        let stats = Arc::new(FeedStats::new());
        let current = CurrentPortionResolver::new(
            Arc::new(calendar),
            stats.clone(),
            FallbackPolicy::CycleStart,
        );
        let loader = PassageLoader::new(Arc::new(scripture), stats.clone());
        (
            GetWeeklyFeedHandler::new(current.clone(), loader.clone(), stats.clone()),
            GetDailyFeedHandler::new(current, loader, stats.clone()),
            stats,
        )
    }

    #[tokio::test]
    async fn test_weekly_feed_extracts_each_portion() {
        let calendar = StaticCalendar::new().with_portion(Location::Diaspora, "Noach");
        let scripture = StaticScripture::synthetic(40);
        let (weekly, _, stats) = handlers(calendar, scripture);

        let feed = weekly
            .handle(GetWeeklyFeed {
                location: Location::Diaspora,
                today: date(2024, 6, 12),
                weeks: 2,
            })
            .await
            .unwrap();

        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].entry.portion_name, "Noach");
        assert_eq!(feed.items[1].entry.portion_name, "Lech-Lecha");

        // Noach: Genesis 6:9-11:32
        let passage = feed.items[0].passage.as_ref().unwrap();
        assert_eq!(passage.status, ExtractionStatus::Complete);
        let flat = passage.text.flatten();
        assert_eq!(flat.first().unwrap(), "Genesis 6:9");
        assert_eq!(flat.last().unwrap(), "Genesis 11:32");
        assert_eq!(stats.snapshot().feeds_generated, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_item_without_text() {
        let calendar = StaticCalendar::new().with_portion(Location::Diaspora, "Bereshit");
        let scripture = StaticScripture::synthetic(40).failing_for("Noach");
        let (weekly, _, stats) = handlers(calendar, scripture);

        let feed = weekly
            .handle(GetWeeklyFeed {
                location: Location::Diaspora,
                today: date(2024, 6, 12),
                weeks: 3,
            })
            .await
            .unwrap();

        assert_eq!(feed.items.len(), 3);
        assert!(feed.items[0].passage.is_some());
        assert!(feed.items[1].passage.is_none());
        assert!(feed.items[2].passage.is_some());
        assert_eq!(stats.snapshot().fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_truncated_text_is_counted() {
        let calendar = StaticCalendar::new().with_portion(Location::Diaspora, "Bereshit");
        // 每章只有 5 节，Bereshit 结束于 6:8
        let scripture = StaticScripture::synthetic(5);
        let (weekly, _, stats) = handlers(calendar, scripture);

        let feed = weekly
            .handle(GetWeeklyFeed {
                location: Location::Diaspora,
                today: date(2024, 6, 12),
                weeks: 1,
            })
            .await
            .unwrap();

        let passage = feed.items[0].passage.as_ref().unwrap();
        assert!(passage.status.is_degraded());
        assert!(!passage.text.is_empty());
        assert_eq!(stats.snapshot().truncated_extractions, 1);
    }

    #[tokio::test]
    async fn test_daily_feed_has_seven_days_per_week() {
        let calendar = StaticCalendar::new().with_portion(Location::Israel, "Ha'azinu");
        let scripture = StaticScripture::synthetic(52);
        let (_, daily, _) = handlers(calendar, scripture);

        let feed = daily
            .handle(GetDailyFeed {
                location: Location::Israel,
                today: date(2024, 10, 9),
                weeks: 2,
            })
            .await
            .unwrap();

        assert_eq!(feed.items.len(), 14);
        assert_eq!(feed.items[0].date, date(2024, 10, 6));
        assert_eq!(feed.items[0].date.weekday(), Weekday::Sun);
        assert_eq!(feed.items[6].date, date(2024, 10, 12));
        assert_eq!(feed.items[7].segment.portion_name, "Vezot Haberakhah");

        // Ha'azinu: 52 节，前 6 天各 7 节
        let week: usize = feed.items[..7].iter().map(|i| i.segment.verses.len()).sum();
        assert_eq!(week, 52);
        assert_eq!(feed.items[0].segment.verse_range_label, "1-7");
        assert!(feed.items.iter().all(|i| i.text_available));
    }

    #[tokio::test]
    async fn test_daily_feed_fetch_failure_yields_empty_segments() {
        let calendar = StaticCalendar::new().with_portion(Location::Diaspora, "Bo");
        let scripture = StaticScripture::synthetic(20).failing_for("Bo");
        let (_, daily, _) = handlers(calendar, scripture);

        let feed = daily
            .handle(GetDailyFeed {
                location: Location::Diaspora,
                today: date(2024, 1, 17),
                weeks: 1,
            })
            .await
            .unwrap();

        assert_eq!(feed.items.len(), 7);
        assert!(feed.items.iter().all(|i| i.segment.is_empty() && !i.text_available));
    }

    #[tokio::test]
    async fn test_weekly_feed_combined_reading_covers_both_portions() {
        let calendar = StaticCalendar::new().with_portion(Location::Diaspora, "Matot-Masei");
        let scripture = StaticScripture::synthetic(60);
        let (weekly, _, _) = handlers(calendar, scripture);

        let feed = weekly
            .handle(GetWeeklyFeed {
                location: Location::Diaspora,
                today: date(2024, 7, 31),
                weeks: 2,
            })
            .await
            .unwrap();

        assert_eq!(feed.items[0].entry.portion_name, "Matot-Masei");
        assert_eq!(feed.items[0].entry.reference.to_dotted(), "Numbers.30.2-36.13");
        let flat = feed.items[0].passage.as_ref().unwrap().text.flatten();
        assert_eq!(flat.first().unwrap(), "Numbers 30:2");
        assert_eq!(flat.last().unwrap(), "Numbers 36:13");
        assert_eq!(feed.items[1].entry.portion_name, "Devarim");
    }

    /// 记录同时进行的请求数
    #[derive(Default)]
    struct TrackingScripture {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ScripturePort for TrackingScripture {
        async fn fetch_text(
            &self,
            reference: &ScriptureReference,
        ) -> Result<ScripturePassage, ScriptureError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(ScripturePassage::new(ScriptureText::Flat(vec![
                reference.to_dotted(),
            ])))
        }
    }

    #[tokio::test]
    async fn test_load_all_bounds_concurrency_and_keeps_order() {
        let scripture = Arc::new(TrackingScripture::default());
        let loader = PassageLoader::new(scripture.clone(), Arc::new(FeedStats::new()));
        let entries =
            crate::domain::generate(PortionCycle::standard(), 0, date(2024, 6, 12), 12).unwrap();

        let passages = loader.load_all(&entries).await;

        assert_eq!(passages.len(), 12);
        for (entry, passage) in entries.iter().zip(&passages) {
            let flat = passage.as_ref().unwrap().text.flatten();
            assert_eq!(flat, vec![entry.reference.to_dotted()]);
        }
        let peak = scripture.peak.load(Ordering::SeqCst);
        assert!(peak > 1, "fetches should overlap, peak {}", peak);
        assert!(peak <= MAX_CONCURRENT_FETCHES, "peak {}", peak);
    }

    #[tokio::test]
    async fn test_weeks_are_validated() {
        let (weekly, daily, _) = handlers(StaticCalendar::new(), StaticScripture::synthetic(10));
        let err = weekly
            .handle(GetWeeklyFeed {
                location: Location::Diaspora,
                today: date(2024, 1, 17),
                weeks: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = daily
            .handle(GetDailyFeed {
                location: Location::Diaspora,
                today: date(2024, 1, 17),
                weeks: MAX_FEED_WEEKS + 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}

//! Feed 降级统计
//!
//! 每条降级路径（日历失败、回退、经文缺失、截断）计数一次，供运维观察

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::ExtractionStatus;

/// 降级计数器
#[derive(Debug, Default)]
pub struct FeedStats {
    calendar_failures: AtomicU64,
    unresolved_portions: AtomicU64,
    fetch_failures: AtomicU64,
    truncated_extractions: AtomicU64,
    unfiltered_fallbacks: AtomicU64,
    feeds_generated: AtomicU64,
}

/// 计数器快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedStatsSnapshot {
    pub calendar_failures: u64,
    pub unresolved_portions: u64,
    pub fetch_failures: u64,
    pub truncated_extractions: u64,
    pub unfiltered_fallbacks: u64,
    pub feeds_generated: u64,
}

impl FeedStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_calendar_failure(&self) {
        self.calendar_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unresolved_portion(&self) {
        self.unresolved_portions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_feed_generated(&self) {
        self.feeds_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// 按提取状态计数，完整结果不计
    pub fn record_extraction(&self, status: ExtractionStatus) {
        match status {
            ExtractionStatus::Complete => {}
            ExtractionStatus::Truncated { .. } => {
                self.truncated_extractions.fetch_add(1, Ordering::Relaxed);
            }
            ExtractionStatus::Unfiltered => {
                self.unfiltered_fallbacks.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self) -> FeedStatsSnapshot {
        FeedStatsSnapshot {
            calendar_failures: self.calendar_failures.load(Ordering::Relaxed),
            unresolved_portions: self.unresolved_portions.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            truncated_extractions: self.truncated_extractions.load(Ordering::Relaxed),
            unfiltered_fallbacks: self.unfiltered_fallbacks.load(Ordering::Relaxed),
            feeds_generated: self.feeds_generated.load(Ordering::Relaxed),
        }
    }
}

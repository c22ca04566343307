//! Schedule Query Handlers

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{CalendarPort, CurrentPortion};
use crate::application::queries::{GetPortion, GetSchedule};
use crate::application::stats::FeedStats;
use crate::domain::{
    generate_from, CyclePosition, FallbackPolicy, Location, PortionCycle, ReferenceResolver,
    ScheduleEntry, ScriptureReference,
};

/// 单次请求允许的最大日程条数（两个完整循环）
pub const MAX_SCHEDULE_COUNT: usize = 108;

// ============================================================================
// Current portion resolution
// ============================================================================

/// 当前循环位置的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// 日历名称直接命中
    Calendar,
    /// 日历给出合并诵读，本周读两部分
    Combined,
    /// 日历无结果或名称未知，使用回退策略
    Fallback,
}

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexResolution {
    pub position: CyclePosition,
    pub source: IndexSource,
}

/// 确定当前循环位置
///
/// 1. 名称精确匹配
/// 2. 合并诵读（如 `Vayakhel-Pekudei`）：本周两部分，下一周从第二部分之后开始
/// 3. 应用回退策略；`Reject` 时返回 `UnresolvedPortion`
pub fn resolve_current_index(
    current: Option<&CurrentPortion>,
    cycle: &PortionCycle,
    policy: FallbackPolicy,
    location: Location,
) -> Result<IndexResolution, ApplicationError> {
    if let Some(current) = current {
        if let Ok(index) = cycle.index_of(&current.name) {
            return Ok(IndexResolution {
                position: CyclePosition::Single(index),
                source: IndexSource::Calendar,
            });
        }
        if let Some((first, second)) = cycle.split_combined(&current.name) {
            return Ok(IndexResolution {
                position: CyclePosition::Combined { first, second },
                source: IndexSource::Combined,
            });
        }
    }

    policy
        .fallback_index()
        .map(|index| IndexResolution {
            position: CyclePosition::Single(index),
            source: IndexSource::Fallback,
        })
        .ok_or_else(|| ApplicationError::UnresolvedPortion {
            location: location.to_string(),
        })
}

/// 当前 parasha 解析器
///
/// 调用日历服务，失败时记录并按回退策略处理
#[derive(Clone)]
pub struct CurrentPortionResolver {
    calendar: Arc<dyn CalendarPort>,
    stats: Arc<FeedStats>,
    fallback: FallbackPolicy,
}

impl CurrentPortionResolver {
    pub fn new(
        calendar: Arc<dyn CalendarPort>,
        stats: Arc<FeedStats>,
        fallback: FallbackPolicy,
    ) -> Self {
        Self {
            calendar,
            stats,
            fallback,
        }
    }

    pub async fn current_position(
        &self,
        location: Location,
        today: NaiveDate,
    ) -> Result<CyclePosition, ApplicationError> {
        let current = match self.calendar.current_portion(location, today).await {
            Ok(current) => current,
            Err(e) => {
                self.stats.record_calendar_failure();
                tracing::warn!(
                    location = %location,
                    error = %e,
                    "Calendar lookup failed, treating current portion as unresolved"
                );
                None
            }
        };

        let cycle = PortionCycle::standard();
        let resolution = resolve_current_index(current.as_ref(), cycle, self.fallback, location)
            .map_err(|e| {
                self.stats.record_unresolved_portion();
                tracing::warn!(
                    location = %location,
                    calendar_name = ?current.as_ref().map(|c| c.name.as_str()),
                    "Current portion unresolved and fallback policy rejects"
                );
                e
            })?;

        match resolution.source {
            IndexSource::Calendar => {
                tracing::debug!(
                    location = %location,
                    portion = cycle.name_at(resolution.position.index_after(0)),
                    "Current portion resolved from calendar"
                );
            }
            IndexSource::Combined => {
                tracing::info!(
                    location = %location,
                    calendar_name = ?current.as_ref().map(|c| c.name.as_str()),
                    next_portion = cycle.name_at(resolution.position.index_after(1)),
                    "Combined reading this week, next week continues after its second portion"
                );
            }
            IndexSource::Fallback => {
                self.stats.record_unresolved_portion();
                tracing::warn!(
                    location = %location,
                    calendar_name = ?current.as_ref().map(|c| c.name.as_str()),
                    policy = ?self.fallback,
                    portion = cycle.name_at(resolution.position.index_after(0)),
                    "Current portion unresolved, applying fallback policy"
                );
            }
        }

        Ok(resolution.position)
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// parasha 引用响应
#[derive(Debug, Clone, Serialize)]
pub struct PortionResponse {
    pub index: usize,
    pub name: String,
    pub reference: ScriptureReference,
    pub display: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetSchedule Handler
pub struct GetScheduleHandler {
    current: CurrentPortionResolver,
}

impl GetScheduleHandler {
    pub fn new(current: CurrentPortionResolver) -> Self {
        Self { current }
    }

    pub async fn handle(&self, query: GetSchedule) -> Result<Vec<ScheduleEntry>, ApplicationError> {
        if query.count == 0 || query.count > MAX_SCHEDULE_COUNT {
            return Err(ApplicationError::validation(format!(
                "count must be between 1 and {}, got {}",
                MAX_SCHEDULE_COUNT, query.count
            )));
        }

        let position = self.current.current_position(query.location, query.today).await?;
        let entries = generate_from(
            PortionCycle::standard(),
            &ReferenceResolver::default(),
            position,
            query.today,
            query.count,
        )?;
        Ok(entries)
    }
}

/// GetPortion Handler
#[derive(Default)]
pub struct GetPortionHandler {
    resolver: ReferenceResolver,
}

impl GetPortionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, query: GetPortion) -> Result<PortionResponse, ApplicationError> {
        let cycle = PortionCycle::standard();
        let index = cycle.index_of(&query.name)?;
        let name = cycle.name_at(index);
        let reference = self.resolver.resolve(name)?;

        Ok(PortionResponse {
            index,
            name: name.to_string(),
            display: reference.to_string(),
            reference,
        })
    }
}

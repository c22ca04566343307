//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::{CacheStats, FeedStatsSnapshot};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Schedule DTOs
// ============================================================================

/// `/api/schedule` 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleParams {
    /// diaspora | israel，默认 diaspora
    pub location: Option<String>,
    /// 条目数，默认与每周 Feed 相同
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleEntryResponse {
    pub portion_name: String,
    pub date: String,
    pub week_start: String,
    pub reference: String,
    pub display: String,
}

// ============================================================================
// Stats DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub feeds: FeedStatsSnapshot,
    /// 缓存关闭时为 None
    pub cache: Option<CacheStats>,
}

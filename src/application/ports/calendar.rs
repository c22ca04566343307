//! Calendar Port - 犹太历日历抽象
//!
//! 提供当前周的 parasha 名称，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Location;

/// Calendar 错误
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 日历给出的当前 parasha
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPortion {
    /// 英文名称（已去掉 "Parashat " 前缀），可能是合并诵读，例如 `Vayakhel-Pekudei`
    pub name: String,
    /// 诵读日期（周六）
    pub date: NaiveDate,
}

/// Calendar Port
#[async_trait]
pub trait CalendarPort: Send + Sync {
    /// 查询 today 当天或之后的第一个周读 parasha
    ///
    /// 日历没有结果时返回 `Ok(None)`，由调用方决定回退策略
    async fn current_portion(
        &self,
        location: Location,
        today: NaiveDate,
    ) -> Result<Option<CurrentPortion>, CalendarError>;

    /// 检查日历服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}

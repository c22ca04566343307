//! Static Calendar - 用于测试和离线运行的日历
//!
//! 按地点返回固定的 parasha 名称，不调用外部服务

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::application::ports::{CalendarError, CalendarPort, CurrentPortion};
use crate::domain::{anchor_saturday, Location};

/// Static Calendar
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    portions: HashMap<Location, String>,
    fail: bool,
}

impl StaticCalendar {
    /// 没有任何 parasha 的日历
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有请求都返回服务错误
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 设置某地点的当前 parasha（可为合并诵读或未知名称）
    pub fn with_portion(mut self, location: Location, name: impl Into<String>) -> Self {
        self.portions.insert(location, name.into());
        self
    }
}

#[async_trait]
impl CalendarPort for StaticCalendar {
    async fn current_portion(
        &self,
        location: Location,
        today: NaiveDate,
    ) -> Result<Option<CurrentPortion>, CalendarError> {
        if self.fail {
            return Err(CalendarError::ServiceError(
                "static calendar configured to fail".to_string(),
            ));
        }

        Ok(self.portions.get(&location).map(|name| CurrentPortion {
            name: name.clone(),
            date: anchor_saturday(today),
        }))
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }
}

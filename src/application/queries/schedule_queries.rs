//! Schedule Queries - 日程与引用查询

use chrono::NaiveDate;

use crate::domain::Location;

/// 获取未来日程查询
#[derive(Debug, Clone)]
pub struct GetSchedule {
    pub location: Location,
    pub today: NaiveDate,
    pub count: usize,
}

/// 获取单个 parasha 引用查询
#[derive(Debug, Clone)]
pub struct GetPortion {
    pub name: String,
}

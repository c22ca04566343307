//! Feed Queries - 周读 / 每日 Feed 查询

use chrono::NaiveDate;

use crate::domain::Location;

/// 获取每周 Feed 查询
#[derive(Debug, Clone)]
pub struct GetWeeklyFeed {
    pub location: Location,
    pub today: NaiveDate,
    /// 包含的周数
    pub weeks: usize,
}

/// 获取每日 Feed 查询
#[derive(Debug, Clone)]
pub struct GetDailyFeed {
    pub location: Location,
    pub today: NaiveDate,
    /// 包含的周数（每周 7 条）
    pub weeks: usize,
}

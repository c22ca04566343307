//! 读经日程生成
//!
//! 从当前循环位置开始，按周生成未来的 parasha 日程，
//! 日期对齐到安息日（周六）。

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::parasha::{ParashaError, PortionCycle, ReferenceResolver, ScriptureReference};

/// 日程条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub portion_name: String,
    pub date: NaiveDate,
    pub reference: ScriptureReference,
}

impl ScheduleEntry {
    /// 该周第一天（周日）
    pub fn week_start(&self) -> NaiveDate {
        self.date - Duration::days(6)
    }
}

/// 锚定的周六：今天是周六则为今天，否则为下一个周六
pub fn anchor_saturday(today: NaiveDate) -> NaiveDate {
    // Sunday = 0 ... Saturday = 6
    let weekday = today.weekday().num_days_from_sunday() as i64;
    today + Duration::days((6 - weekday) % 7)
}

/// 本周在循环中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePosition {
    /// 本周诵读单个 parasha
    Single(usize),
    /// 本周合并诵读相邻两个 parasha，下一周从 `second + 1` 开始
    Combined { first: usize, second: usize },
}

impl CyclePosition {
    /// 本周之后第 `weeks` 周的循环位置
    pub fn index_after(&self, weeks: usize) -> usize {
        match *self {
            CyclePosition::Single(index) => index + weeks,
            CyclePosition::Combined { second, .. } => second + weeks,
        }
    }
}

/// 生成 count 条日程
///
/// - 第 i 条日期为 anchor + 7i 天
/// - 第 i 条 parasha 为 cycle.name_at(current_index + i)，按 54 循环
///
/// `current_index` 由调用方确定（已应用回退策略）
pub fn generate(
    cycle: &PortionCycle,
    current_index: usize,
    today: NaiveDate,
    count: usize,
) -> Result<Vec<ScheduleEntry>, ParashaError> {
    generate_with(cycle, &ReferenceResolver::default(), current_index, today, count)
}

/// 使用指定解析器生成日程
pub fn generate_with(
    cycle: &PortionCycle,
    resolver: &ReferenceResolver,
    current_index: usize,
    today: NaiveDate,
    count: usize,
) -> Result<Vec<ScheduleEntry>, ParashaError> {
    generate_from(cycle, resolver, CyclePosition::Single(current_index), today, count)
}

/// 从指定位置生成日程
///
/// 合并诵读时第 0 条为两部分合并的条目（名称 `First-Second`，引用覆盖两部分），
/// 第 i 条（i ≥ 1）为 cycle.name_at(second + i)
pub fn generate_from(
    cycle: &PortionCycle,
    resolver: &ReferenceResolver,
    position: CyclePosition,
    today: NaiveDate,
    count: usize,
) -> Result<Vec<ScheduleEntry>, ParashaError> {
    let anchor = anchor_saturday(today);

    (0..count)
        .map(|i| {
            let date = anchor + Duration::weeks(i as i64);
            match position {
                CyclePosition::Combined { first, second } if i == 0 => {
                    combined_entry(cycle, resolver, first, second, date)
                }
                _ => {
                    let portion_name = cycle.name_at(position.index_after(i));
                    Ok(ScheduleEntry {
                        portion_name: portion_name.to_string(),
                        date,
                        reference: resolver.resolve(portion_name)?,
                    })
                }
            }
        })
        .collect()
}

fn combined_entry(
    cycle: &PortionCycle,
    resolver: &ReferenceResolver,
    first: usize,
    second: usize,
    date: NaiveDate,
) -> Result<ScheduleEntry, ParashaError> {
    let first_name = cycle.name_at(first);
    let second_name = cycle.name_at(second);
    let portion_name = format!("{}-{}", first_name, second_name);
    let reference = resolver
        .resolve(first_name)?
        .through(&resolver.resolve(second_name)?)
        .map_err(|_| ParashaError::malformed(&portion_name, "combined portions span two books"))?;

    Ok(ScheduleEntry {
        portion_name,
        date,
        reference,
    })
}

//! 每日分段
//!
//! 将一周的经文切分为 7 个连续的每日片段（周日开始）

use serde::Serialize;

use super::text::ScriptureText;

/// 每周天数
pub const DAYS_PER_WEEK: usize = 7;

/// 周日开始的星期名称
pub const WEEKDAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// 每日片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySegment {
    /// 1..=7
    pub day_index: usize,
    pub day_name: String,
    pub portion_name: String,
    /// 片段起始位置（0 起，未截断），7 个片段严格递增
    pub offset: usize,
    pub verses: Vec<String>,
    /// "start-end"（1 起闭区间），空片段为空字符串
    pub verse_range_label: String,
}

impl DailySegment {
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

/// 每天分到的经节数：max(1, total / 7)
#[inline]
fn verses_per_day(total: usize) -> usize {
    (total / DAYS_PER_WEEK).max(1)
}

/// 第 day 天（0 起）的区间，已截断到 total
///
/// 前 6 天各 per_day 节，第 7 天取剩余全部
#[inline]
fn day_bounds(day: usize, per_day: usize, total: usize) -> (usize, usize) {
    let start = day * per_day;
    let end = if day < DAYS_PER_WEEK - 1 {
        start + per_day
    } else {
        total
    };
    (start.min(total), end.min(total).max(start.min(total)))
}

fn range_label(start: usize, end: usize) -> String {
    if end > start {
        format!("{}-{}", start + 1, end)
    } else {
        String::new()
    }
}

/// 分段
///
/// 1. 按章节顺序展平
/// 2. per_day = max(1, total / 7)，前 6 天各取 per_day 节
/// 3. 第 7 天取剩余部分
///
/// 总是返回 7 个片段。不足 7 节时靠后的片段为空。
pub fn partition(
    text: &ScriptureText,
    portion_name: &str,
    day_names: &[&str; DAYS_PER_WEEK],
) -> Vec<DailySegment> {
    let verses = text.flatten();
    let total = verses.len();
    let per_day = verses_per_day(total);

    (0..DAYS_PER_WEEK)
        .map(|day| {
            let (start, end) = day_bounds(day, per_day, total);
            DailySegment {
                day_index: day + 1,
                day_name: day_names[day].to_string(),
                portion_name: portion_name.to_string(),
                offset: day * per_day,
                verses: verses[start..end].to_vec(),
                verse_range_label: range_label(start, end),
            }
        })
        .collect()
}

/// 使用默认星期名称分段（便捷方法）
pub fn partition_default(text: &ScriptureText, portion_name: &str) -> Vec<DailySegment> {
    partition(text, portion_name, &WEEKDAY_NAMES)
}

//! Parasha Context - Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::cycle::PortionCycle;
use super::ParashaError;

/// 日历地区
///
/// 以色列与海外（diaspora）的诵读安排在节期前后可能相差一周
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    Diaspora,
    Israel,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Diaspora => "diaspora",
            Location::Israel => "israel",
        }
    }

    /// 标题用名称
    pub fn title(&self) -> &'static str {
        match self {
            Location::Diaspora => "Diaspora",
            Location::Israel => "Israel",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ParashaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diaspora" => Ok(Location::Diaspora),
            "israel" => Ok(Location::Israel),
            _ => Err(ParashaError::InvalidLocation(s.to_string())),
        }
    }
}

/// 当前 parasha 无法确定时的回退策略
///
/// 由调用方显式注入，核心逻辑不会自行选择默认名称
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// 从循环起点（Bereshit）开始
    CycleStart,
    /// 从指定循环位置开始
    Portion(usize),
    /// 拒绝生成，向调用方报告错误
    Reject,
}

impl FallbackPolicy {
    /// 解析配置值：`cycle_start`、`reject` 或某个 parasha 名称
    pub fn parse(raw: &str, cycle: &PortionCycle) -> Result<Self, ParashaError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Err(ParashaError::InvalidFallbackPolicy(raw.to_string())),
            "cycle_start" => Ok(FallbackPolicy::CycleStart),
            "reject" => Ok(FallbackPolicy::Reject),
            _ => cycle
                .index_of(raw)
                .map(FallbackPolicy::Portion)
                .map_err(|_| ParashaError::InvalidFallbackPolicy(raw.to_string())),
        }
    }

    /// 回退后的循环位置，`Reject` 返回 None
    pub fn fallback_index(&self) -> Option<usize> {
        match self {
            FallbackPolicy::CycleStart => Some(0),
            FallbackPolicy::Portion(index) => Some(*index),
            FallbackPolicy::Reject => None,
        }
    }
}

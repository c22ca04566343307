//! Domain Layer - 领域层
//!
//! 纯同步逻辑，无 I/O，可在任意线程并发调用:
//! - Parasha Context: 周读循环、引用表、引用解析
//! - Scripture Context: 经文结构、范围提取、每日分段
//! - Schedule: 日程生成

pub mod parasha;
pub mod schedule;
pub mod scripture;

pub use parasha::{
    normalize_apostrophes, resolve_portion, FallbackPolicy, Location, ParashaError, PortionCycle,
    ReferenceResolver, ReferenceTable, ScriptureReference, CYCLE_LENGTH,
};
pub use schedule::{anchor_saturday, generate, generate_from, CyclePosition, ScheduleEntry};
pub use scripture::{
    extract, extract_with_status, partition, partition_default, Chapter, DailySegment,
    Extraction, ExtractionStatus, ScriptureText, WEEKDAY_NAMES,
};

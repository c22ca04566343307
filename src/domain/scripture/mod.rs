//! Scripture Context - 经文文本上下文
//!
//! 职责:
//! - 经文文本结构（平铺 / 按章）
//! - 引用范围提取
//! - 每日分段

mod extractor;
mod partitioner;
mod text;

pub use extractor::{extract, extract_with_status, Extraction, ExtractionStatus};
pub use partitioner::{partition, partition_default, DailySegment, DAYS_PER_WEEK, WEEKDAY_NAMES};
pub use text::{Chapter, ScriptureText};

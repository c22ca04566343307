//! Parasha Context - 周读经文上下文
//!
//! 职责:
//! - 54 周读经循环（名称 ↔ 位置）
//! - 内置经文引用表
//! - 引用字符串解析

mod cycle;
mod errors;
mod reference;
mod reference_table;
mod value_objects;

pub use cycle::{normalize_apostrophes, PortionCycle, CYCLE_LENGTH, PORTION_NAMES};
pub use errors::ParashaError;
pub use reference::{resolve_portion, ReferenceResolver, ScriptureReference};
pub use reference_table::{ReferenceTable, REFERENCE_ENTRIES};
pub use value_objects::{FallbackPolicy, Location};

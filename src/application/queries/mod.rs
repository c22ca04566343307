//! 应用层 - 查询（读操作）
//!
//! 服务只有读操作：日程、引用、Feed

mod feed_queries;
mod schedule_queries;

pub mod handlers;

pub use feed_queries::*;
pub use schedule_queries::*;

//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod calendar;
pub mod scripture;

pub use calendar::*;
pub use scripture::*;

//! HTTP Handlers
//!
//! - index: 首页
//! - feeds: RSS Feed
//! - api: JSON 接口（日程、引用、统计）
//! - ping: 健康检查

mod api;
mod feeds;
mod index;
mod ping;

pub use api::*;
pub use feeds::*;
pub use index::*;
pub use ping::*;

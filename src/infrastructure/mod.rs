//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现，以及 RSS 渲染与 HTTP 服务

pub mod adapters;
pub mod http;
pub mod memory;
pub mod persistence;
pub mod rss;

pub use adapters::{HebcalClient, SefariaClient, StaticCalendar, StaticScripture};
pub use memory::InMemoryFeedCache;
pub use persistence::SledFeedCache;
pub use rss::RssRenderer;

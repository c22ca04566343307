//! RSS Layer - RSS 2.0 渲染
//!
//! - html: 条目正文（content:encoded）的 HTML 片段
//! - renderer: 频道与条目的 XML 输出

mod html;
mod renderer;

pub use renderer::{RssError, RssRenderer};

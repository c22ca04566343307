//! Torah Feed - 每周 / 每日 Torah 读经 RSS 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Parasha Context: 周读循环、引用表、回退策略
//! - Scripture Context: 经文结构、范围提取、每日分段
//! - Schedule: 日程生成
//!
//! 应用层 (application/):
//! - Ports: CalendarPort, ScripturePort, FeedCachePort
//! - Queries: 日程、parasha、每周 / 每日 Feed 查询处理器
//! - Stats: 降级计数
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Hebcal 日历客户端、Sefaria 经文客户端、测试用静态实现
//! - Persistence: Sled Feed 缓存
//! - Memory: 内存 Feed 缓存
//! - RSS: RSS 2.0 渲染
//! - HTTP: Feed 与 JSON API

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

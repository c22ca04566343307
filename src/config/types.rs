//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::domain::{FallbackPolicy, ParashaError, PortionCycle};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 日历服务（Hebcal）配置
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// 经文服务（Sefaria）配置
    #[serde(default)]
    pub scripture: ScriptureConfig,

    /// Feed 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// Feed 生成配置
    #[serde(default)]
    pub feeds: FeedsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（Feed 链接使用）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 日历服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Hebcal API 地址
    #[serde(default = "default_calendar_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_calendar_timeout")]
    pub timeout_secs: u64,

    /// 以色列日历使用的 geonameid（默认耶路撒冷）
    #[serde(default = "default_israel_geoname_id")]
    pub israel_geoname_id: Option<u32>,
}

fn default_calendar_url() -> String {
    "https://www.hebcal.com/hebcal".to_string()
}

fn default_calendar_timeout() -> u64 {
    10
}

fn default_israel_geoname_id() -> Option<u32> {
    Some(281184)
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            url: default_calendar_url(),
            timeout_secs: default_calendar_timeout(),
            israel_geoname_id: default_israel_geoname_id(),
        }
    }
}

/// 经文服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptureConfig {
    /// Sefaria API 地址
    #[serde(default = "default_scripture_url")]
    pub url: String,

    /// 译本名称，None 时使用 Sefaria 默认译本
    #[serde(default = "default_scripture_version")]
    pub version: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_scripture_timeout")]
    pub timeout_secs: u64,
}

fn default_scripture_url() -> String {
    "https://www.sefaria.org/api".to_string()
}

fn default_scripture_version() -> Option<String> {
    Some("The Contemporary Torah, Jewish Publication Society, 2006".to_string())
}

fn default_scripture_timeout() -> u64 {
    20
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            url: default_scripture_url(),
            version: default_scripture_version(),
            timeout_secs: default_scripture_timeout(),
        }
    }
}

/// Feed 缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 是否启用缓存
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Sled 数据库路径
    #[serde(default = "default_cache_path")]
    pub path: String,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_path() -> String {
    "data/feed_cache.sled".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            path: default_cache_path(),
        }
    }
}

/// Feed 生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    /// 每周 Feed 包含的周数
    #[serde(default = "default_weekly_weeks")]
    pub weekly_weeks: usize,

    /// 每日 Feed 包含的周数
    #[serde(default = "default_daily_weeks")]
    pub daily_weeks: usize,

    /// 每周 Feed 缓存有效期（秒）
    #[serde(default = "default_weekly_ttl")]
    pub weekly_ttl_secs: u64,

    /// 每日 Feed 缓存有效期（秒）
    #[serde(default = "default_daily_ttl")]
    pub daily_ttl_secs: u64,

    /// 回退策略：cycle_start、reject 或 parasha 名称
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_weekly_weeks() -> usize {
    8
}

fn default_daily_weeks() -> usize {
    4
}

fn default_weekly_ttl() -> u64 {
    6 * 3600
}

fn default_daily_ttl() -> u64 {
    2 * 3600
}

fn default_fallback() -> String {
    "cycle_start".to_string()
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            weekly_weeks: default_weekly_weeks(),
            daily_weeks: default_daily_weeks(),
            weekly_ttl_secs: default_weekly_ttl(),
            daily_ttl_secs: default_daily_ttl(),
            fallback: default_fallback(),
        }
    }
}

impl FeedsConfig {
    pub fn weekly_ttl(&self) -> Duration {
        Duration::from_secs(self.weekly_ttl_secs)
    }

    pub fn daily_ttl(&self) -> Duration {
        Duration::from_secs(self.daily_ttl_secs)
    }

    /// 解析回退策略
    pub fn fallback_policy(&self) -> Result<FallbackPolicy, ParashaError> {
        FallbackPolicy::parse(&self.fallback, PortionCycle::standard())
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::CYCLE_LENGTH;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TORAH_FEED_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TORAH_FEED_SERVER__PORT=8080`
/// - `TORAH_FEED_SERVER__BASE_URL=https://torah.example`
/// - `TORAH_FEED_FEEDS__FALLBACK=reject`
/// - `TORAH_FEED_CACHE__ENABLED=false`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("calendar.url", "https://www.hebcal.com/hebcal")?
        .set_default("calendar.timeout_secs", 10)?
        .set_default("scripture.url", "https://www.sefaria.org/api")?
        .set_default("scripture.timeout_secs", 20)?
        .set_default("cache.enabled", true)?
        .set_default("cache.path", "data/feed_cache.sled")?
        .set_default("feeds.weekly_weeks", 8)?
        .set_default("feeds.daily_weeks", 4)?
        .set_default("feeds.weekly_ttl_secs", 6 * 3600)?
        .set_default("feeds.daily_ttl_secs", 2 * 3600)?
        .set_default("feeds.fallback", "cycle_start")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），例如 TORAH_FEED_FEEDS__DAILY_WEEKS=2
    builder = builder.add_source(
        Environment::with_prefix("TORAH_FEED")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.calendar.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Calendar URL cannot be empty".to_string(),
        ));
    }

    if config.scripture.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Scripture URL cannot be empty".to_string(),
        ));
    }

    if config.cache.enabled && config.cache.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Cache path cannot be empty when cache is enabled".to_string(),
        ));
    }

    for (name, weeks) in [
        ("weekly_weeks", config.feeds.weekly_weeks),
        ("daily_weeks", config.feeds.daily_weeks),
    ] {
        if weeks == 0 || weeks > CYCLE_LENGTH {
            return Err(ConfigError::ValidationError(format!(
                "feeds.{} must be between 1 and {}, got {}",
                name, CYCLE_LENGTH, weeks
            )));
        }
    }

    config
        .feeds
        .fallback_policy()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Calendar URL: {}", config.calendar.url);
    tracing::info!("Scripture URL: {}", config.scripture.url);
    tracing::info!(
        "Scripture Version: {}",
        config.scripture.version.as_deref().unwrap_or("(default)")
    );
    tracing::info!("Cache Enabled: {}", config.cache.enabled);
    if config.cache.enabled {
        tracing::info!("Cache Path: {}", config.cache.path);
    }
    tracing::info!(
        "Feeds: weekly={} weeks (ttl {}s), daily={} weeks (ttl {}s)",
        config.feeds.weekly_weeks,
        config.feeds.weekly_ttl_secs,
        config.feeds.daily_weeks,
        config.feeds.daily_ttl_secs
    );
    tracing::info!("Fallback Policy: {}", config.feeds.fallback);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

//! Torah Feed - 每周 / 每日 Torah 读经 RSS 服务
//!
//! 组装：配置 → 日志 → 外部服务客户端 → 缓存 → HTTP 服务器

use std::sync::Arc;
use std::time::Duration;

use torah_feed::application::FeedCachePort;
use torah_feed::config::{load_config, print_config, AppConfig, LogConfig};
use torah_feed::infrastructure::adapters::{
    HebcalClient, HebcalClientConfig, SefariaClient, SefariaClientConfig,
};
use torah_feed::infrastructure::http::{AppState, FeedSettings, HttpServer, ServerConfig};
use torah_feed::infrastructure::persistence::{SledCacheConfig, SledFeedCache};
use tracing_subscriber::EnvFilter;

/// 初始化日志，RUST_LOG 优先于配置中的级别
fn init_tracing(log: &LogConfig) {
    let default_filter = format!(
        "{},torah_feed={},tower_http=debug",
        log.level, log.level
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

fn feed_settings(config: &AppConfig) -> anyhow::Result<FeedSettings> {
    Ok(FeedSettings {
        weekly_weeks: config.feeds.weekly_weeks,
        daily_weeks: config.feeds.daily_weeks,
        weekly_ttl: config.feeds.weekly_ttl(),
        daily_ttl: config.feeds.daily_ttl(),
        fallback: config.feeds.fallback_policy()?,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Torah Feed starting");
    print_config(&config);

    // 两个外部服务共用一个连接池，超时按请求设置
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("torah-feed/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .build()?;

    let calendar = Arc::new(HebcalClient::new(
        http_client.clone(),
        HebcalClientConfig {
            url: config.calendar.url.clone(),
            timeout_secs: config.calendar.timeout_secs,
            israel_geoname_id: config.calendar.israel_geoname_id,
        },
    ));

    // 空字符串表示使用 Sefaria 默认译本
    let version = config
        .scripture
        .version
        .clone()
        .filter(|v| !v.trim().is_empty());
    let scripture = Arc::new(SefariaClient::new(
        http_client,
        SefariaClientConfig::new(&config.scripture.url)
            .with_version(version)
            .with_timeout(config.scripture.timeout_secs),
    ));

    let feed_cache: Option<Arc<dyn FeedCachePort>> = if config.cache.enabled {
        if let Some(parent) = std::path::Path::new(&config.cache.path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let cache = SledFeedCache::new(&SledCacheConfig {
            db_path: config.cache.path.clone(),
        })?;
        Some(Arc::new(cache))
    } else {
        tracing::warn!("Feed cache disabled, every request renders a fresh feed");
        None
    };

    let state = AppState::new(
        calendar,
        scripture,
        feed_cache,
        feed_settings(&config)?,
        config.server.public_base_url(),
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

//! Feed Handlers - RSS 输出
//!
//! 流程：查缓存 → 未命中时生成并渲染 → 写缓存 → 带 ETag 返回

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use std::sync::Arc;
use std::time::Duration;

use crate::application::{feed_cache_key, GetDailyFeed, GetWeeklyFeed};
use crate::domain::Location;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedKind {
    Weekly,
    Daily,
}

impl FeedKind {
    fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Weekly => "weekly",
            FeedKind::Daily => "daily",
        }
    }

    fn ttl(&self, state: &AppState) -> Duration {
        match self {
            FeedKind::Weekly => state.settings.weekly_ttl,
            FeedKind::Daily => state.settings.daily_ttl,
        }
    }
}

/// 解析路径中的地点，缺省为 diaspora
pub(crate) fn parse_location(raw: Option<&str>) -> Result<Location, ApiError> {
    match raw {
        None => Ok(Location::default()),
        Some(raw) => raw
            .parse()
            .map_err(|e: crate::domain::ParashaError| ApiError::BadRequest(e.to_string())),
    }
}

/// 响应体的强 ETag
fn etag_for(body: &str) -> String {
    format!("\"{:x}\"", md5::compute(body.as_bytes()))
}

fn rss_response(body: String, ttl: Duration, request_headers: &HeaderMap) -> Result<Response, ApiError> {
    let etag = etag_for(&body);
    let not_modified = request_headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.split(',').any(|tag| tag.trim() == etag));

    let builder = Response::builder()
        .header(header::ETAG, &etag)
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", ttl.as_secs()),
        );

    let response = if not_modified {
        builder.status(StatusCode::NOT_MODIFIED).body(Body::empty())
    } else {
        builder
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, HeaderValue::from_static(RSS_CONTENT_TYPE))
            .body(Body::from(body))
    };

    response.map_err(|e| ApiError::Internal(e.to_string()))
}

/// 生成并渲染 Feed（不经过缓存）
async fn render_feed(state: &AppState, kind: FeedKind, location: Location) -> Result<String, ApiError> {
    let now = state.now();
    let today = now.date_naive();

    let rendered = match kind {
        FeedKind::Weekly => {
            let feed = state
                .weekly_feed_handler
                .handle(GetWeeklyFeed {
                    location,
                    today,
                    weeks: state.settings.weekly_weeks,
                })
                .await?;
            state.renderer.render_weekly(&feed, now)
        }
        FeedKind::Daily => {
            let feed = state
                .daily_feed_handler
                .handle(GetDailyFeed {
                    location,
                    today,
                    weeks: state.settings.daily_weeks,
                })
                .await?;
            state.renderer.render_daily(&feed, now)
        }
    };

    rendered.map_err(|e| ApiError::Internal(e.to_string()))
}

async fn serve_feed(
    state: &AppState,
    kind: FeedKind,
    location: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let location = parse_location(location)?;
    let ttl = kind.ttl(state);
    let key = feed_cache_key(kind.as_str(), location.as_str());

    if let Some(cache) = &state.feed_cache {
        match cache.get(&key, ttl).await {
            Ok(Some(body)) => {
                tracing::debug!(key = %key, "Serving feed from cache");
                return rss_response(body, ttl, headers);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "Feed cache read failed"),
        }
    }

    let body = render_feed(state, kind, location).await?;

    if let Some(cache) = &state.feed_cache {
        if let Err(e) = cache.put(&key, &body).await {
            tracing::warn!(key = %key, error = %e, "Feed cache write failed");
        }
    }

    rss_response(body, ttl, headers)
}

/// GET /feeds/weekly[/:location]
pub async fn weekly_feed(
    State(state): State<Arc<AppState>>,
    location: Option<Path<String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let location = location.map(|Path(l)| l);
    serve_feed(&state, FeedKind::Weekly, location.as_deref(), &headers).await
}

/// GET /feeds/daily[/:location]
pub async fn daily_feed(
    State(state): State<Arc<AppState>>,
    location: Option<Path<String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let location = location.map(|Path(l)| l);
    serve_feed(&state, FeedKind::Daily, location.as_deref(), &headers).await
}

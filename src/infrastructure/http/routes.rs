//! HTTP Routes
//!
//! Endpoints:
//! - /                          GET  首页
//! - /feeds/weekly[/:location]  GET  每周 RSS
//! - /feeds/daily[/:location]   GET  每日 RSS
//! - /api/ping                  GET  健康检查
//! - /api/stats                 GET  降级计数与缓存统计
//! - /api/schedule              GET  未来日程（?location=&count=）
//! - /api/portions/:name        GET  parasha 引用

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .nest("/feeds", feed_routes())
        .nest("/api", api_routes())
}

/// Feed 路由
fn feed_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/weekly", get(handlers::weekly_feed))
        .route("/weekly/:location", get(handlers::weekly_feed))
        .route("/daily", get(handlers::daily_feed))
        .route("/daily/:location", get(handlers::daily_feed))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/stats", get(handlers::get_stats))
        .route("/schedule", get(handlers::get_schedule))
        .route("/portions/:name", get(handlers::get_portion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use chrono::{TimeZone, Utc};
    use tower::util::ServiceExt;

    use crate::domain::{FallbackPolicy, Location};
    use crate::infrastructure::adapters::{StaticCalendar, StaticScripture};
    use crate::infrastructure::http::state::FeedSettings;
    use crate::infrastructure::memory::InMemoryFeedCache;

    fn test_state(calendar: StaticCalendar, fallback: FallbackPolicy) -> Arc<AppState> {
        let settings = FeedSettings {
            weekly_weeks: 2,
            daily_weeks: 1,
            fallback,
            ..FeedSettings::default()
        };
        let state = AppState::new(
            Arc::new(calendar),
            Arc::new(StaticScripture::synthetic(40)),
            Some(Arc::new(InMemoryFeedCache::new())),
            settings,
            "http://feeds.test",
        )
        // 2024-06-12 是周三
        .with_fixed_now(Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap());
        Arc::new(state)
    }

    fn app(state: Arc<AppState>) -> Router {
        create_routes().with_state(state)
    }

    fn default_app() -> Router {
        app(test_state(
            StaticCalendar::new().with_portion(Location::Diaspora, "Nasso"),
            FallbackPolicy::CycleStart,
        ))
    }

    async fn send(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let response = send(default_app(), "/api/ping").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["cache_enabled"], true);
    }

    #[tokio::test]
    async fn test_index_lists_feeds() {
        let response = send(default_app(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("http://feeds.test/feeds/weekly/israel"));
        assert!(html.contains("http://feeds.test/feeds/daily/diaspora"));
    }

    #[tokio::test]
    async fn test_weekly_feed_is_rss_with_etag() {
        let response = send(default_app(), "/feeds/weekly").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/rss+xml; charset=utf-8"
        );
        assert!(response.headers().contains_key(header::ETAG));

        let xml = body_string(response).await;
        assert!(xml.contains("<title>Parashat Nasso</title>"));
        assert!(xml.contains("<title>Parashat Beha&apos;alotcha</title>"));
        assert_eq!(xml.matches("<item>").count(), 2);
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache_and_not_modified() {
        let state = test_state(
            StaticCalendar::new().with_portion(Location::Israel, "Korach"),
            FallbackPolicy::CycleStart,
        );

        let first = send(app(state.clone()), "/feeds/daily/israel").await;
        let etag = first.headers()[header::ETAG].clone();

        let second = app(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/feeds/daily/israel")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);

        let stats = body_json(send(app(state), "/api/stats").await).await;
        assert_eq!(stats["errno"], 0);
        assert_eq!(stats["data"]["feeds"]["feeds_generated"], 1);
        assert_eq!(stats["data"]["cache"]["hit_count"], 1);
        assert_eq!(stats["data"]["cache"]["miss_count"], 1);
    }

    #[tokio::test]
    async fn test_daily_feed_has_seven_items_per_week() {
        let response = send(default_app(), "/feeds/daily/diaspora").await;
        assert_eq!(response.status(), StatusCode::OK);
        let xml = body_string(response).await;
        assert_eq!(xml.matches("<item>").count(), 7);
        assert!(xml.contains("<title>Sunday - Parashat Nasso (Day 1)</title>"));
    }

    #[tokio::test]
    async fn test_invalid_location_is_bad_request() {
        let response = send(default_app(), "/feeds/weekly/mars").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["errno"], 400);
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn test_reject_policy_without_calendar_is_unavailable() {
        let state = test_state(StaticCalendar::new(), FallbackPolicy::Reject);
        let response = send(app(state.clone()), "/feeds/weekly/israel").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let stats = body_json(send(app(state), "/api/stats").await).await;
        assert_eq!(stats["data"]["feeds"]["unresolved_portions"], 1);
    }

    #[tokio::test]
    async fn test_schedule_api() {
        let response = send(default_app(), "/api/schedule?location=diaspora&count=3").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let entries = json["data"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["portion_name"], "Nasso");
        assert_eq!(entries[0]["date"], "2024-06-15");
        assert_eq!(entries[0]["week_start"], "2024-06-09");
        assert_eq!(entries[0]["reference"], "Numbers.4.21-7.89");
        assert_eq!(entries[2]["date"], "2024-06-29");
    }

    #[tokio::test]
    async fn test_schedule_api_rejects_zero_count() {
        let response = send(default_app(), "/api/schedule?count=0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_portion_api() {
        let response = send(default_app(), "/api/portions/Re%E2%80%99eh").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["name"], "Re'eh");
        assert_eq!(json["data"]["index"], 46);

        let response = send(default_app(), "/api/portions/Purim").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

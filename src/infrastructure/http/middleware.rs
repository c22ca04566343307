//! HTTP Middleware
//!
//! 状态码错误日志与 Feed 耗时日志

use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};

/// 超过该耗时的 Feed 请求记 warn（通常是上游未命中缓存）
pub const SLOW_FEED_THRESHOLD: Duration = Duration::from_secs(5);

/// HTTP 状态码错误日志中间件
///
/// 4xx 记 warn，5xx 记 error
/// 业务错误详情在 ApiError::into_response() 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

/// Feed 耗时日志中间件，只作用于 /feeds 路径
pub async fn feed_timing_middleware(request: Request, next: Next) -> Response {
    if !request.uri().path().starts_with("/feeds") {
        return next.run(request).await;
    }

    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed();

    if elapsed >= SLOW_FEED_THRESHOLD {
        tracing::warn!(
            path = %path,
            status = %response.status().as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Slow feed request"
        );
    } else {
        tracing::debug!(
            path = %path,
            status = %response.status().as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Feed request served"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn rss_handler() -> &'static str {
        "<rss/>"
    }

    async fn unavailable_handler() -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    async fn bad_request_handler() -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/feeds/weekly", get(rss_handler))
            .route("/feeds/daily", get(unavailable_handler))
            .route("/api/schedule", get(bad_request_handler))
            .layer(axum::middleware::from_fn(feed_timing_middleware))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = HttpRequest::builder().uri(uri).body(Body::empty()).unwrap();
        create_test_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_feed_response_passes_through() {
        assert_eq!(status_of("/feeds/weekly").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_server_error_status_preserved() {
        assert_eq!(status_of("/feeds/daily").await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_non_feed_client_error_preserved() {
        assert_eq!(status_of("/api/schedule").await, StatusCode::BAD_REQUEST);
    }
}

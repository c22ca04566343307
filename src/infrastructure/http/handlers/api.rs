//! JSON API Handlers - 日程、parasha 引用、降级统计

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{GetPortion, GetSchedule, PortionResponse};
use crate::infrastructure::http::dto::{
    ApiResponse, ScheduleEntryResponse, ScheduleParams, StatsResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

use super::feeds::parse_location;

/// GET /api/schedule?location=&count=
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScheduleParams>,
) -> Result<Json<ApiResponse<Vec<ScheduleEntryResponse>>>, ApiError> {
    let location = parse_location(params.location.as_deref())?;
    let query = GetSchedule {
        location,
        today: state.now().date_naive(),
        count: params.count.unwrap_or(state.settings.weekly_weeks),
    };

    let entries = state.schedule_handler.handle(query).await?;
    let response = entries
        .into_iter()
        .map(|entry| ScheduleEntryResponse {
            week_start: entry.week_start().to_string(),
            date: entry.date.to_string(),
            reference: entry.reference.to_dotted(),
            display: entry.reference.to_string(),
            portion_name: entry.portion_name,
        })
        .collect();

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/portions/:name
pub async fn get_portion(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<PortionResponse>>, ApiError> {
    let portion = state.portion_handler.handle(GetPortion { name })?;
    Ok(Json(ApiResponse::success(portion)))
}

/// GET /api/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsResponse>> {
    let cache = match &state.feed_cache {
        Some(cache) => Some(cache.stats().await),
        None => None,
    };

    Json(ApiResponse::success(StatsResponse {
        feeds: state.stats.snapshot(),
        cache,
    }))
}

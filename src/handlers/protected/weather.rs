//! Weather endpoints: stored records per location plus the external
//! provider pass-through.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::weather::{self, WeatherFields, WeatherRecord};
use crate::error::ApiError;
use crate::handlers::protected::market::TrendSummary;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::AppState;

/// Window of recent records considered for the temperature trend.
const TREND_WINDOW: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    #[serde(default = "default_forecast_days")]
    pub days: i64,
}

fn default_forecast_days() -> i64 {
    7
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_days")]
    pub days: i64,
}

fn default_history_days() -> i64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct CoordsQuery {
    pub lat: f64,
    pub lon: f64,
}

/// GET /api/weather/current/:location - most recent stored record
pub async fn current_weather(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> ApiResult<WeatherRecord> {
    let record = weather::latest_for_location(&state.pool, &location)
        .await?
        .ok_or_else(|| ApiError::not_found("Weather data not found for this location"))?;

    Ok(ApiResponse::success(record))
}

/// GET /api/weather/forecast/:location - records dated within the next days
pub async fn forecast(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> ApiResult<Vec<WeatherRecord>> {
    let records = weather::forecast(&state.pool, &location, query.days).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/weather/history/:location - records from the past days
pub async fn history(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<WeatherRecord>> {
    let records = weather::history(&state.pool, &location, query.days).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/weather/trend/:location - temperature trend over the recent window
pub async fn temperature_trend(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> ApiResult<TrendSummary> {
    let window = weather::recent_window(&state.pool, &location, TREND_WINDOW).await?;
    let temperatures: Vec<f64> = window.iter().map(|r| r.temperature).collect();

    Ok(ApiResponse::success(TrendSummary::from_window(
        &temperatures,
    )))
}

/// POST /api/weather - record a weather observation
pub async fn create_record(
    State(state): State<AppState>,
    Json(fields): Json<WeatherFields>,
) -> ApiResult<WeatherRecord> {
    let record = weather::create(&state.pool, &fields).await?;
    Ok(ApiResponse::created(record))
}

/// GET /api/weather/live - current conditions from the external provider
pub async fn live_current(
    State(state): State<AppState>,
    Query(coords): Query<CoordsQuery>,
) -> ApiResult<Value> {
    let payload = state
        .weather
        .current(coords.lat, coords.lon)
        .await
        .map_err(provider_error)?;

    Ok(ApiResponse::success(payload))
}

/// GET /api/weather/live/forecast - forecast from the external provider
pub async fn live_forecast(
    State(state): State<AppState>,
    Query(coords): Query<CoordsQuery>,
) -> ApiResult<Value> {
    let payload = state
        .weather
        .forecast(coords.lat, coords.lon)
        .await
        .map_err(provider_error)?;

    Ok(ApiResponse::success(payload))
}

fn provider_error(err: reqwest::Error) -> ApiError {
    tracing::error!("Weather provider request failed: {}", err);
    ApiError::bad_gateway("Weather provider unavailable")
}

//! Market price endpoints, including the bounded trend computation.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::database::crops;
use crate::database::market::{self, MarketPrice, MarketPriceFields};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::AppState;

const CROP_NOT_FOUND: &str = "Crop not found";

/// Window of recent prices considered for trend analysis.
const TREND_WINDOW: i64 = 90;

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub market: Option<String>,
    pub crop_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_days")]
    pub days: i64,
}

fn default_history_days() -> i64 {
    30
}

/// Derived trend over a bounded window. Fewer than two observations yields
/// the `insufficient_data` sentinel, which is a defined result, not an error.
#[derive(Debug, Serialize, PartialEq)]
pub struct TrendSummary {
    pub trend: &'static str,
    pub current: Option<f64>,
    pub average: Option<f64>,
    pub change_percent: Option<f64>,
}

impl TrendSummary {
    /// `values` are ordered newest first. Change is
    /// `(newest - oldest) / oldest * 100` over the window.
    pub fn from_window(values: &[f64]) -> Self {
        let current = values.first().copied();
        let average = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };

        if let (Some(&newest), Some(&oldest)) = (values.first(), values.last()) {
            if values.len() >= 2 && oldest != 0.0 {
                let change = (newest - oldest) / oldest * 100.0;
                return Self {
                    trend: if change > 0.0 { "rising" } else { "falling" },
                    current,
                    average,
                    change_percent: Some(change),
                };
            }
        }

        Self {
            trend: "insufficient_data",
            current,
            average,
            change_percent: None,
        }
    }
}

/// GET /api/market/prices/current - today's prices with optional filters
pub async fn current_prices(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> ApiResult<Vec<MarketPrice>> {
    let prices = market::current_prices(
        &state.pool,
        query.market.as_deref(),
        query.crop_id,
        query.skip,
        query.limit,
    )
    .await?;

    Ok(ApiResponse::success(prices))
}

/// GET /api/market/prices/history/:crop_id - recent prices, newest first
pub async fn price_history(
    State(state): State<AppState>,
    Path(crop_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<MarketPrice>> {
    require_crop(&state, crop_id).await?;

    let prices = market::history(&state.pool, crop_id, query.days).await?;
    Ok(ApiResponse::success(prices))
}

/// GET /api/market/markets - distinct market names
pub async fn list_markets(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let markets = market::market_names(&state.pool).await?;
    Ok(ApiResponse::success(markets))
}

/// GET /api/market/trends/:crop_id - trend over the recent price window
pub async fn price_trends(
    State(state): State<AppState>,
    Path(crop_id): Path<i64>,
) -> ApiResult<TrendSummary> {
    require_crop(&state, crop_id).await?;

    let window = market::history(&state.pool, crop_id, TREND_WINDOW).await?;
    let prices: Vec<f64> = window.iter().map(|p| p.price).collect();

    Ok(ApiResponse::success(TrendSummary::from_window(&prices)))
}

/// POST /api/market/prices - record a market price
pub async fn create_price(
    State(state): State<AppState>,
    Json(fields): Json<MarketPriceFields>,
) -> ApiResult<MarketPrice> {
    require_crop(&state, fields.crop_id).await?;

    let price = market::create(&state.pool, &fields).await?;
    Ok(ApiResponse::created(price))
}

async fn require_crop(state: &AppState, crop_id: i64) -> Result<(), ApiError> {
    crops::find(&state.pool, crop_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found(CROP_NOT_FOUND))
}

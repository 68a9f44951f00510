//! Crop catalog endpoints. The catalog is shared across accounts: reads
//! require authentication but are not ownership-scoped.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::database::crops::{self, Crop, CropFields, Disease, DiseaseFields};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::AppState;

const CROP_NOT_FOUND: &str = "Crop not found";

#[derive(Debug, Deserialize)]
pub struct CropListQuery {
    pub season: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct CropDetail {
    #[serde(flatten)]
    pub crop: Crop,
    pub diseases: Vec<Disease>,
}

/// GET /api/crops - list crops, optionally filtered by season
pub async fn list_crops(
    State(state): State<AppState>,
    Query(query): Query<CropListQuery>,
) -> ApiResult<Vec<Crop>> {
    let crops = crops::list(&state.pool, query.season.as_deref(), query.skip, query.limit).await?;
    Ok(ApiResponse::success(crops))
}

/// GET /api/crops/:id - crop detail with known diseases
pub async fn get_crop(
    State(state): State<AppState>,
    Path(crop_id): Path<i64>,
) -> ApiResult<CropDetail> {
    let crop = crops::find(&state.pool, crop_id)
        .await?
        .ok_or_else(|| ApiError::not_found(CROP_NOT_FOUND))?;
    let diseases = crops::diseases_for_crop(&state.pool, crop.id).await?;

    Ok(ApiResponse::success(CropDetail { crop, diseases }))
}

/// POST /api/crops - add a crop to the catalog
pub async fn create_crop(
    State(state): State<AppState>,
    Json(fields): Json<CropFields>,
) -> ApiResult<Crop> {
    let crop = crops::create(&state.pool, &fields).await?;
    Ok(ApiResponse::created(crop))
}

/// GET /api/crops/:id/diseases - diseases associated with a crop
pub async fn list_diseases(
    State(state): State<AppState>,
    Path(crop_id): Path<i64>,
) -> ApiResult<Vec<Disease>> {
    crops::find(&state.pool, crop_id)
        .await?
        .ok_or_else(|| ApiError::not_found(CROP_NOT_FOUND))?;

    let diseases = crops::diseases_for_crop(&state.pool, crop_id).await?;
    Ok(ApiResponse::success(diseases))
}

/// POST /api/crops/diseases - add a disease entry for a crop
pub async fn create_disease(
    State(state): State<AppState>,
    Json(fields): Json<DiseaseFields>,
) -> ApiResult<Disease> {
    crops::find(&state.pool, fields.crop_id)
        .await?
        .ok_or_else(|| ApiError::not_found(CROP_NOT_FOUND))?;

    let disease = crops::create_disease(&state.pool, &fields).await?;
    Ok(ApiResponse::created(disease))
}

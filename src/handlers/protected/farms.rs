//! Farm endpoints. Every operation is ownership-scoped: a farm belonging to
//! another account returns the same 404 as a farm that does not exist.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::database::crops::{self, Crop};
use crate::database::farms::{self, Farm, FarmFields};
use crate::database::soil_tests::{self, SoilTest, SoilTestFields};
use crate::error::ApiError;
use crate::middleware::auth::Caller;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::AppState;

const FARM_NOT_FOUND: &str = "Farm not found";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct FarmDetail {
    #[serde(flatten)]
    pub farm: Farm,
    pub crops: Vec<Crop>,
}

/// POST /api/farms - create a farm owned by the caller
pub async fn create_farm(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Json(fields): Json<FarmFields>,
) -> ApiResult<Farm> {
    let farm = farms::create(&state.pool, account.id, &fields).await?;
    Ok(ApiResponse::created(farm))
}

/// GET /api/farms - list the caller's farms
pub async fn list_farms(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Query(page): Query<ListQuery>,
) -> ApiResult<Vec<Farm>> {
    let farms = farms::list_for_owner(&state.pool, account.id, page.skip, page.limit).await?;
    Ok(ApiResponse::success(farms))
}

/// GET /api/farms/:id - farm detail with planted crops
pub async fn get_farm(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Path(farm_id): Path<i64>,
) -> ApiResult<FarmDetail> {
    let farm = owned_farm(&state, farm_id, account.id).await?;
    let crops = farms::crops_for_farm(&state.pool, farm.id).await?;

    Ok(ApiResponse::success(FarmDetail { farm, crops }))
}

/// PUT /api/farms/:id - whole-record replacement
pub async fn update_farm(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Path(farm_id): Path<i64>,
    Json(fields): Json<FarmFields>,
) -> ApiResult<Farm> {
    let farm = farms::update_owned(&state.pool, farm_id, account.id, &fields)
        .await?
        .ok_or_else(|| ApiError::not_found(FARM_NOT_FOUND))?;

    Ok(ApiResponse::success(farm))
}

/// DELETE /api/farms/:id - hard delete
pub async fn delete_farm(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Path(farm_id): Path<i64>,
) -> ApiResult<Value> {
    let deleted = farms::delete_owned(&state.pool, farm_id, account.id).await?;
    if !deleted {
        return Err(ApiError::not_found(FARM_NOT_FOUND));
    }

    Ok(ApiResponse::success(
        json!({ "message": "Farm deleted successfully" }),
    ))
}

/// GET /api/farms/:id/soil-tests - soil test history for an owned farm
pub async fn list_soil_tests(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Path(farm_id): Path<i64>,
) -> ApiResult<Vec<SoilTest>> {
    let farm = owned_farm(&state, farm_id, account.id).await?;
    let tests = soil_tests::list_for_farm(&state.pool, farm.id).await?;

    Ok(ApiResponse::success(tests))
}

/// POST /api/farms/:id/soil-tests - record a soil test
pub async fn create_soil_test(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Path(farm_id): Path<i64>,
    Json(fields): Json<SoilTestFields>,
) -> ApiResult<SoilTest> {
    let farm = owned_farm(&state, farm_id, account.id).await?;
    let test = soil_tests::create(&state.pool, farm.id, &fields).await?;

    Ok(ApiResponse::created(test))
}

/// POST /api/farms/:id/crops/:crop_id - plant a catalog crop on an owned farm
pub async fn plant_crop(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Path((farm_id, crop_id)): Path<(i64, i64)>,
) -> ApiResult<Value> {
    let farm = owned_farm(&state, farm_id, account.id).await?;
    crops::find(&state.pool, crop_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Crop not found"))?;

    farms::plant_crop(&state.pool, farm.id, crop_id).await?;

    Ok(ApiResponse::success(
        json!({ "farm_id": farm.id, "crop_id": crop_id }),
    ))
}

/// DELETE /api/farms/:id/crops/:crop_id - remove a planted crop
pub async fn unplant_crop(
    State(state): State<AppState>,
    Extension(Caller(account)): Extension<Caller>,
    Path((farm_id, crop_id)): Path<(i64, i64)>,
) -> ApiResult<Value> {
    let farm = owned_farm(&state, farm_id, account.id).await?;

    let removed = farms::unplant_crop(&state.pool, farm.id, crop_id).await?;
    if !removed {
        return Err(ApiError::not_found("Crop is not planted on this farm"));
    }

    Ok(ApiResponse::success(
        json!({ "message": "Crop removed from farm" }),
    ))
}

/// Resolve a farm that must belong to the caller. Ownership violations and
/// absence are deliberately indistinguishable.
async fn owned_farm(state: &AppState, farm_id: i64, owner_id: i64) -> Result<Farm, ApiError> {
    farms::find_owned(&state.pool, farm_id, owner_id)
        .await?
        .ok_or_else(|| ApiError::not_found(FARM_NOT_FOUND))
}

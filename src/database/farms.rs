use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::database::crops::Crop;

/// An ownership-scoped farm record. All reads and writes are keyed by both
/// farm id and owner id so another account's farms are indistinguishable
/// from absent ones.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Farm {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub area: f64,
    pub soil_type: String,
    pub irrigation_type: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whole-record fields for create and replace. Updates are not partial.
#[derive(Debug, Deserialize)]
pub struct FarmFields {
    pub name: String,
    pub location: String,
    pub area: f64,
    pub soil_type: String,
    pub irrigation_type: String,
}

pub async fn create(
    pool: &SqlitePool,
    owner_id: i64,
    fields: &FarmFields,
) -> Result<Farm, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Farm>(
        r#"
        INSERT INTO farms (name, location, area, soil_type, irrigation_type, owner_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.location)
    .bind(fields.area)
    .bind(&fields.soil_type)
    .bind(&fields.irrigation_type)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn list_for_owner(
    pool: &SqlitePool,
    owner_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Farm>, sqlx::Error> {
    sqlx::query_as::<_, Farm>(
        "SELECT * FROM farms WHERE owner_id = ? ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(owner_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await
}

pub async fn find_owned(
    pool: &SqlitePool,
    id: i64,
    owner_id: i64,
) -> Result<Option<Farm>, sqlx::Error> {
    sqlx::query_as::<_, Farm>("SELECT * FROM farms WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
}

/// Replace every mutable field. Returns `None` when the farm does not exist
/// or is not owned by `owner_id`.
pub async fn update_owned(
    pool: &SqlitePool,
    id: i64,
    owner_id: i64,
    fields: &FarmFields,
) -> Result<Option<Farm>, sqlx::Error> {
    sqlx::query_as::<_, Farm>(
        r#"
        UPDATE farms
        SET name = ?, location = ?, area = ?, soil_type = ?, irrigation_type = ?, updated_at = ?
        WHERE id = ? AND owner_id = ?
        RETURNING *
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.location)
    .bind(fields.area)
    .bind(&fields.soil_type)
    .bind(&fields.irrigation_type)
    .bind(Utc::now())
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

/// Hard delete. Returns false when nothing matched.
pub async fn delete_owned(pool: &SqlitePool, id: i64, owner_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM farms WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn plant_crop(pool: &SqlitePool, farm_id: i64, crop_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO farm_crops (farm_id, crop_id) VALUES (?, ?)")
        .bind(farm_id)
        .bind(crop_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn unplant_crop(
    pool: &SqlitePool,
    farm_id: i64,
    crop_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM farm_crops WHERE farm_id = ? AND crop_id = ?")
        .bind(farm_id)
        .bind(crop_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn crops_for_farm(pool: &SqlitePool, farm_id: i64) -> Result<Vec<Crop>, sqlx::Error> {
    sqlx::query_as::<_, Crop>(
        r#"
        SELECT c.*
        FROM crops c
        JOIN farm_crops fc ON fc.crop_id = c.id
        WHERE fc.farm_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(farm_id)
    .fetch_all(pool)
    .await
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Catalog entry for a crop. The catalog is shared: reads are authenticated
/// but not ownership-scoped.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Crop {
    pub id: i64,
    pub name: String,
    pub name_local: String,
    pub scientific_name: String,
    pub season: String,
    pub duration: i64,
    pub water_requirement: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CropFields {
    pub name: String,
    #[serde(default)]
    pub name_local: String,
    #[serde(default)]
    pub scientific_name: String,
    pub season: String,
    pub duration: i64,
    pub water_requirement: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Disease {
    pub id: i64,
    pub crop_id: i64,
    pub name: String,
    pub name_local: String,
    pub symptoms: String,
    pub prevention: String,
    pub treatment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DiseaseFields {
    pub crop_id: i64,
    pub name: String,
    #[serde(default)]
    pub name_local: String,
    pub symptoms: String,
    pub prevention: String,
    pub treatment: String,
}

pub async fn create(pool: &SqlitePool, fields: &CropFields) -> Result<Crop, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Crop>(
        r#"
        INSERT INTO crops (name, name_local, scientific_name, season, duration, water_requirement, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.name_local)
    .bind(&fields.scientific_name)
    .bind(&fields.season)
    .bind(fields.duration)
    .bind(fields.water_requirement)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn list(
    pool: &SqlitePool,
    season: Option<&str>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Crop>, sqlx::Error> {
    let mut sql = String::from("SELECT * FROM crops");
    if season.is_some() {
        sql.push_str(" WHERE season = ?");
    }
    sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");

    let mut query = sqlx::query_as::<_, Crop>(&sql);
    if let Some(season) = season {
        query = query.bind(season.to_string());
    }

    query.bind(limit).bind(skip).fetch_all(pool).await
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Crop>, sqlx::Error> {
    sqlx::query_as::<_, Crop>("SELECT * FROM crops WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_disease(
    pool: &SqlitePool,
    fields: &DiseaseFields,
) -> Result<Disease, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Disease>(
        r#"
        INSERT INTO diseases (crop_id, name, name_local, symptoms, prevention, treatment, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(fields.crop_id)
    .bind(&fields.name)
    .bind(&fields.name_local)
    .bind(&fields.symptoms)
    .bind(&fields.prevention)
    .bind(&fields.treatment)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn diseases_for_crop(
    pool: &SqlitePool,
    crop_id: i64,
) -> Result<Vec<Disease>, sqlx::Error> {
    sqlx::query_as::<_, Disease>("SELECT * FROM diseases WHERE crop_id = ? ORDER BY id")
        .bind(crop_id)
        .fetch_all(pool)
        .await
}

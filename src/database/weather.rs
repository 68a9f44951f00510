use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WeatherRecord {
    pub id: i64,
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherFields {
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
    pub date: DateTime<Utc>,
}

pub async fn create(
    pool: &SqlitePool,
    fields: &WeatherFields,
) -> Result<WeatherRecord, sqlx::Error> {
    sqlx::query_as::<_, WeatherRecord>(
        r#"
        INSERT INTO weather_records (location, temperature, humidity, rainfall, wind_speed, date, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&fields.location)
    .bind(fields.temperature)
    .bind(fields.humidity)
    .bind(fields.rainfall)
    .bind(fields.wind_speed)
    .bind(fields.date)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Most recent record for a location, if any.
pub async fn latest_for_location(
    pool: &SqlitePool,
    location: &str,
) -> Result<Option<WeatherRecord>, sqlx::Error> {
    sqlx::query_as::<_, WeatherRecord>(
        "SELECT * FROM weather_records WHERE location = ? ORDER BY date DESC LIMIT 1",
    )
    .bind(location)
    .fetch_optional(pool)
    .await
}

/// Records dated within [now, now + days], ascending.
pub async fn forecast(
    pool: &SqlitePool,
    location: &str,
    days: i64,
) -> Result<Vec<WeatherRecord>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, WeatherRecord>(
        "SELECT * FROM weather_records WHERE location = ? AND date >= ? AND date <= ? ORDER BY date ASC",
    )
    .bind(location)
    .bind(now)
    .bind(now + Duration::days(days))
    .fetch_all(pool)
    .await
}

/// Records within the past `days`, newest first.
pub async fn history(
    pool: &SqlitePool,
    location: &str,
    days: i64,
) -> Result<Vec<WeatherRecord>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, WeatherRecord>(
        "SELECT * FROM weather_records WHERE location = ? AND date >= ? AND date <= ? ORDER BY date DESC",
    )
    .bind(location)
    .bind(now - Duration::days(days))
    .bind(now)
    .fetch_all(pool)
    .await
}

/// Bounded window of the most recent records for trend analysis, newest first.
pub async fn recent_window(
    pool: &SqlitePool,
    location: &str,
    limit: i64,
) -> Result<Vec<WeatherRecord>, sqlx::Error> {
    sqlx::query_as::<_, WeatherRecord>(
        "SELECT * FROM weather_records WHERE location = ? ORDER BY date DESC LIMIT ?",
    )
    .bind(location)
    .bind(limit)
    .fetch_all(pool)
    .await
}

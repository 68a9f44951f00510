use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MarketPrice {
    pub id: i64,
    pub crop_id: i64,
    pub market_name: String,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct MarketPriceFields {
    pub crop_id: i64,
    pub market_name: String,
    pub price: f64,
    pub date: DateTime<Utc>,
}

pub async fn create(
    pool: &SqlitePool,
    fields: &MarketPriceFields,
) -> Result<MarketPrice, sqlx::Error> {
    sqlx::query_as::<_, MarketPrice>(
        r#"
        INSERT INTO market_prices (crop_id, market_name, price, date, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(fields.crop_id)
    .bind(&fields.market_name)
    .bind(fields.price)
    .bind(fields.date)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Prices dated today or later, with optional equality filters.
pub async fn current_prices(
    pool: &SqlitePool,
    market: Option<&str>,
    crop_id: Option<i64>,
    skip: i64,
    limit: i64,
) -> Result<Vec<MarketPrice>, sqlx::Error> {
    let start_of_day = Utc::now()
        .date_naive()
        .and_time(chrono::NaiveTime::MIN)
        .and_utc();

    let mut sql = String::from("SELECT * FROM market_prices WHERE date >= ?");
    if market.is_some() {
        sql.push_str(" AND market_name = ?");
    }
    if crop_id.is_some() {
        sql.push_str(" AND crop_id = ?");
    }
    sql.push_str(" ORDER BY market_name LIMIT ? OFFSET ?");

    let mut query = sqlx::query_as::<_, MarketPrice>(&sql).bind(start_of_day);
    if let Some(market) = market {
        query = query.bind(market.to_string());
    }
    if let Some(crop_id) = crop_id {
        query = query.bind(crop_id);
    }

    query.bind(limit).bind(skip).fetch_all(pool).await
}

/// Most recent prices for a crop, newest first.
pub async fn history(
    pool: &SqlitePool,
    crop_id: i64,
    limit: i64,
) -> Result<Vec<MarketPrice>, sqlx::Error> {
    sqlx::query_as::<_, MarketPrice>(
        "SELECT * FROM market_prices WHERE crop_id = ? ORDER BY date DESC LIMIT ?",
    )
    .bind(crop_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn market_names(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT market_name FROM market_prices ORDER BY market_name")
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

//! SQLite-backed storage layer. One pool is created at startup and shared
//! through application state; the embedded schema is applied on connect.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod accounts;
pub mod crops;
pub mod farms;
pub mod market;
pub mod weather;

/// Schema for the seven entity tables plus the farm/crop join table.
/// Timestamps are RFC 3339 text, maintained by the query layer on write.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    email               TEXT NOT NULL UNIQUE,
    phone               TEXT NOT NULL UNIQUE,
    password_hash       TEXT NOT NULL,
    full_name           TEXT NOT NULL,
    language_preference TEXT NOT NULL DEFAULT 'en',
    is_active           INTEGER NOT NULL DEFAULT 1,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS farms (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    location        TEXT NOT NULL,
    area            REAL NOT NULL,
    soil_type       TEXT NOT NULL,
    irrigation_type TEXT NOT NULL,
    owner_id        INTEGER NOT NULL REFERENCES accounts(id),
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS crops (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    name_local        TEXT NOT NULL DEFAULT '',
    scientific_name   TEXT NOT NULL DEFAULT '',
    season            TEXT NOT NULL,
    duration          INTEGER NOT NULL,
    water_requirement REAL NOT NULL,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS farm_crops (
    farm_id INTEGER NOT NULL REFERENCES farms(id),
    crop_id INTEGER NOT NULL REFERENCES crops(id),
    PRIMARY KEY (farm_id, crop_id)
);

CREATE TABLE IF NOT EXISTS diseases (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    crop_id    INTEGER NOT NULL REFERENCES crops(id),
    name       TEXT NOT NULL,
    name_local TEXT NOT NULL DEFAULT '',
    symptoms   TEXT NOT NULL,
    prevention TEXT NOT NULL,
    treatment  TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS soil_tests (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    farm_id        INTEGER NOT NULL REFERENCES farms(id),
    ph             REAL NOT NULL,
    nitrogen       REAL NOT NULL,
    phosphorus     REAL NOT NULL,
    potassium      REAL NOT NULL,
    organic_matter REAL NOT NULL,
    test_date      TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS weather_records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    location    TEXT NOT NULL,
    temperature REAL NOT NULL,
    humidity    REAL NOT NULL,
    rainfall    REAL NOT NULL,
    wind_speed  REAL NOT NULL,
    date        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS market_prices (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    crop_id     INTEGER NOT NULL REFERENCES crops(id),
    market_name TEXT NOT NULL,
    price       REAL NOT NULL,
    date        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_farms_owner ON farms(owner_id);
CREATE INDEX IF NOT EXISTS idx_market_prices_crop ON market_prices(crop_id, date);
CREATE INDEX IF NOT EXISTS idx_weather_location ON weather_records(location, date);
"#;

/// Connect to the store and apply the schema.
///
/// In-memory databases are pinned to a single connection so every request
/// sees the same database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool = pool_options(in_memory).connect_with(options).await?;

    sqlx::raw_sql(SCHEMA).execute(&pool).await?;

    Ok(pool)
}

/// An in-memory sqlite database lives and dies with its connection, so the
/// pool must hold exactly one and never let the reaper recycle it: a
/// replacement connection would open a fresh database without the schema.
fn pool_options(in_memory: bool) -> SqlitePoolOptions {
    if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

/// Pings the pool to ensure connectivity.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

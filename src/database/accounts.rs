use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub language_preference: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted at registration, minus the raw password.
#[derive(Debug, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub language_preference: String,
}

pub async fn create(
    pool: &SqlitePool,
    fields: &NewAccount,
    password_hash: &str,
) -> Result<Account, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (email, phone, password_hash, full_name, language_preference, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 1, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&fields.email)
    .bind(&fields.phone)
    .bind(password_hash)
    .bind(&fields.full_name)
    .bind(&fields.language_preference)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// True when either unique field is already taken.
pub async fn email_or_phone_taken(
    pool: &SqlitePool,
    email: &str,
    phone: &str,
) -> Result<bool, sqlx::Error> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM accounts WHERE email = ? OR phone = ? LIMIT 1")
            .bind(email)
            .bind(phone)
            .fetch_optional(pool)
            .await?;

    Ok(existing.is_some())
}

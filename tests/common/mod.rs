use anyhow::{Context, Result};
use serde_json::{json, Value};

use fasal_api::{app, config::AppConfig, database, AppState};

/// Signing secret shared between the in-process server and tests that need
/// to mint their own tokens (e.g. expired ones).
pub const TEST_SECRET: &str = "integration-test-secret";

pub const TEST_PASSWORD: &str = "green-fields-9";

pub struct TestServer {
    pub base_url: String,
    /// Handle on the server's own pool, for tests that need to reach behind
    /// the API (deactivating accounts, closing the store).
    pub pool: sqlx::SqlitePool,
}

/// Spawn the full router on an ephemeral port with a fresh in-memory store.
/// Each test file gets its own isolated server and database.
pub async fn spawn_server() -> Result<TestServer> {
    let config = AppConfig {
        bind_host: "127.0.0.1".to_string(),
        bind_port: 0,
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        token_ttl_minutes: 30,
        cors_origins: vec!["*".to_string()],
        weather_api_key: String::new(),
        // Unroutable on purpose: live weather tests only assert the gateway
        // error mapping, never a real provider call.
        weather_base_url: "http://127.0.0.1:9".to_string(),
    };

    let pool = database::connect(&config.database_url)
        .await
        .context("failed to open in-memory database")?;
    let state = AppState::new(config, pool.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("test server");
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        pool,
    })
}

/// Flag an account inactive directly in the store.
pub async fn deactivate_account(pool: &sqlx::SqlitePool, email: &str) -> Result<()> {
    sqlx::query("UPDATE accounts SET is_active = 0 WHERE email = ?")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn register(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    phone: &str,
) -> Result<Value> {
    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "email": email,
            "phone": phone,
            "full_name": "Test Farmer",
            "password": TEST_PASSWORD
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status().is_success(),
        "registration failed: {}",
        res.status()
    );
    Ok(res.json::<Value>().await?)
}

pub async fn login(client: &reqwest::Client, base_url: &str, email: &str) -> Result<String> {
    let res = client
        .post(format!("{}/api/auth/token", base_url))
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .send()
        .await?;

    anyhow::ensure!(res.status().is_success(), "login failed: {}", res.status());

    let body = res.json::<Value>().await?;
    body["data"]["access_token"]
        .as_str()
        .map(|s| s.to_string())
        .context("missing access_token in login response")
}

pub async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    phone: &str,
) -> Result<String> {
    register(client, base_url, email, phone).await?;
    login(client, base_url, email).await
}

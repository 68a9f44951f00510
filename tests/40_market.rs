mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn setup_crop(client: &reqwest::Client, base_url: &str, token: &str) -> Result<i64> {
    let res = client
        .post(format!("{}/api/crops", base_url))
        .bearer_auth(token)
        .json(&json!({
            "name": "Soybean",
            "season": "kharif",
            "duration": 100,
            "water_requirement": 500.0
        }))
        .send()
        .await?;
    Ok(res.json::<Value>().await?["data"]["id"].as_i64().unwrap())
}

async fn add_price(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    crop_id: i64,
    market: &str,
    price: f64,
    date: chrono::DateTime<Utc>,
) -> Result<()> {
    let res = client
        .post(format!("{}/api/market/prices", base_url))
        .bearer_auth(token)
        .json(&json!({
            "crop_id": crop_id,
            "market_name": market,
            "price": price,
            "date": date
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create price failed");
    Ok(())
}

#[tokio::test]
async fn current_prices_support_filters() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "mkt@example.com", "9300000001")
            .await?;
    let crop_id = setup_crop(&client, &server.base_url, &token).await?;

    let now = Utc::now();
    add_price(&client, &server.base_url, &token, crop_id, "Itarsi Mandi", 4200.0, now).await?;
    add_price(&client, &server.base_url, &token, crop_id, "Bhopal Mandi", 4350.0, now).await?;

    let all = client
        .get(format!("{}/api/market/prices/current", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let all_body = all.json::<Value>().await?;
    assert_eq!(all_body["data"].as_array().unwrap().len(), 2);

    let filtered = client
        .get(format!(
            "{}/api/market/prices/current?market=Itarsi%20Mandi",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let filtered_body = filtered.json::<Value>().await?;
    let rows = filtered_body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["market_name"], "Itarsi Mandi");
    assert_eq!(rows[0]["price"], 4200.0);
    Ok(())
}

#[tokio::test]
async fn markets_are_distinct_and_sorted() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "mkts@example.com", "9300000002")
            .await?;
    let crop_id = setup_crop(&client, &server.base_url, &token).await?;

    let now = Utc::now();
    add_price(&client, &server.base_url, &token, crop_id, "Zeta", 100.0, now).await?;
    add_price(&client, &server.base_url, &token, crop_id, "Alpha", 101.0, now).await?;
    add_price(&client, &server.base_url, &token, crop_id, "Alpha", 102.0, now).await?;

    let res = client
        .get(format!("{}/api/market/markets", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"], json!(["Alpha", "Zeta"]));
    Ok(())
}

#[tokio::test]
async fn trend_needs_at_least_two_records() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "tr1@example.com", "9300000003")
            .await?;
    let crop_id = setup_crop(&client, &server.base_url, &token).await?;

    // No data at all
    let empty = client
        .get(format!("{}/api/market/trends/{}", server.base_url, crop_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(empty.status(), StatusCode::OK);
    let empty_body = empty.json::<Value>().await?;
    assert_eq!(empty_body["data"]["trend"], "insufficient_data");

    // Exactly one record is still insufficient
    add_price(&client, &server.base_url, &token, crop_id, "Solo", 4000.0, Utc::now()).await?;
    let single = client
        .get(format!("{}/api/market/trends/{}", server.base_url, crop_id))
        .bearer_auth(&token)
        .send()
        .await?;
    let single_body = single.json::<Value>().await?;
    assert_eq!(single_body["data"]["trend"], "insufficient_data");
    assert_eq!(single_body["data"]["change_percent"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn trend_change_is_newest_vs_oldest() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "tr2@example.com", "9300000004")
            .await?;
    let crop_id = setup_crop(&client, &server.base_url, &token).await?;

    let now = Utc::now();
    // Oldest 4000, newest 4400 -> +10%
    add_price(&client, &server.base_url, &token, crop_id, "M", 4000.0, now - Duration::days(10)).await?;
    add_price(&client, &server.base_url, &token, crop_id, "M", 4100.0, now - Duration::days(5)).await?;
    add_price(&client, &server.base_url, &token, crop_id, "M", 4400.0, now).await?;

    let res = client
        .get(format!("{}/api/market/trends/{}", server.base_url, crop_id))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["trend"], "rising");
    assert_eq!(body["data"]["current"], 4400.0);
    let change = body["data"]["change_percent"].as_f64().unwrap();
    assert!((change - 10.0).abs() < 1e-9, "unexpected change {}", change);
    Ok(())
}

#[tokio::test]
async fn history_is_newest_first_and_crop_checked() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "hist@example.com", "9300000005")
            .await?;
    let crop_id = setup_crop(&client, &server.base_url, &token).await?;

    let now = Utc::now();
    add_price(&client, &server.base_url, &token, crop_id, "M", 4000.0, now - Duration::days(2)).await?;
    add_price(&client, &server.base_url, &token, crop_id, "M", 4200.0, now).await?;

    let res = client
        .get(format!(
            "{}/api/market/prices/history/{}",
            server.base_url, crop_id
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["price"], 4200.0);
    assert_eq!(rows[1]["price"], 4000.0);

    let missing = client
        .get(format!("{}/api/market/prices/history/999", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let missing_trend = client
        .get(format!("{}/api/market/trends/999", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(missing_trend.status(), StatusCode::NOT_FOUND);
    Ok(())
}

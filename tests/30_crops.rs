mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_crop(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    season: &str,
) -> Result<i64> {
    let res = client
        .post(format!("{}/api/crops", base_url))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "name_local": "",
            "scientific_name": "",
            "season": season,
            "duration": 120,
            "water_requirement": 450.0
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create crop failed");
    Ok(res.json::<Value>().await?["data"]["id"].as_i64().unwrap())
}

#[tokio::test]
async fn list_supports_season_filter_and_pagination() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "crops@example.com", "9200000001")
            .await?;

    create_crop(&client, &server.base_url, &token, "Wheat", "rabi").await?;
    create_crop(&client, &server.base_url, &token, "Mustard", "rabi").await?;
    create_crop(&client, &server.base_url, &token, "Rice", "kharif").await?;

    let all = client
        .get(format!("{}/api/crops", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(all.json::<Value>().await?["data"].as_array().unwrap().len(), 3);

    let rabi = client
        .get(format!("{}/api/crops?season=rabi", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let rabi_body = rabi.json::<Value>().await?;
    let rabi_crops = rabi_body["data"].as_array().unwrap();
    assert_eq!(rabi_crops.len(), 2);
    assert!(rabi_crops.iter().all(|c| c["season"] == "rabi"));

    let paged = client
        .get(format!("{}/api/crops?skip=1&limit=1", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let paged_body = paged.json::<Value>().await?;
    let page = paged_body["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["name"], "Mustard");
    Ok(())
}

#[tokio::test]
async fn crop_detail_includes_diseases() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "dis@example.com", "9200000002")
            .await?;

    let crop_id = create_crop(&client, &server.base_url, &token, "Tomato", "zaid").await?;

    let disease = client
        .post(format!("{}/api/crops/diseases", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "crop_id": crop_id,
            "name": "Early Blight",
            "symptoms": "Dark concentric spots on lower leaves",
            "prevention": "Rotate crops and avoid overhead watering",
            "treatment": "Apply appropriate fungicide"
        }))
        .send()
        .await?;
    assert_eq!(disease.status(), StatusCode::CREATED);

    let detail = client
        .get(format!("{}/api/crops/{}", server.base_url, crop_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(detail.status(), StatusCode::OK);
    let body = detail.json::<Value>().await?;
    assert_eq!(body["data"]["name"], "Tomato");
    assert_eq!(body["data"]["diseases"][0]["name"], "Early Blight");

    let listed = client
        .get(format!("{}/api/crops/{}/diseases", server.base_url, crop_id))
        .bearer_auth(&token)
        .send()
        .await?;
    let listed_body = listed.json::<Value>().await?;
    assert_eq!(listed_body["data"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_crop_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let token =
        common::register_and_login(&client, &server.base_url, "nf@example.com", "9200000003")
            .await?;

    let detail = client
        .get(format!("{}/api/crops/999", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);

    let diseases = client
        .get(format!("{}/api/crops/999/diseases", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(diseases.status(), StatusCode::NOT_FOUND);

    // Disease entries must reference an existing crop
    let orphan = client
        .post(format!("{}/api/crops/diseases", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "crop_id": 999,
            "name": "Ghost Rot",
            "symptoms": "-",
            "prevention": "-",
            "treatment": "-"
        }))
        .send()
        .await?;
    assert_eq!(orphan.status(), StatusCode::NOT_FOUND);
    Ok(())
}

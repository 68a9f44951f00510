use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use config::AppConfig;
use services::weather_client::WeatherClient;

/// Shared application state: read-only configuration, the store pool and the
/// external weather client. Constructed once at startup and injected into
/// every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
    pub weather: WeatherClient,
}

impl AppState {
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let weather = WeatherClient::new(
            config.weather_base_url.clone(),
            config.weather_api_key.clone(),
        );
        Self {
            config: Arc::new(config),
            pool,
            weather,
        }
    }
}

/// Build the full router. Everything under `/api` except registration and
/// token issuance passes through the authorization guard and the
/// active-account check.
pub fn app(state: AppState) -> Router {
    use handlers::{protected, public};

    let protected_routes = Router::new()
        .route("/api/auth/me", get(protected::auth::me))
        // Farms (ownership-scoped)
        .route(
            "/api/farms",
            post(protected::farms::create_farm).get(protected::farms::list_farms),
        )
        .route(
            "/api/farms/:id",
            get(protected::farms::get_farm)
                .put(protected::farms::update_farm)
                .delete(protected::farms::delete_farm),
        )
        .route(
            "/api/farms/:id/soil-tests",
            get(protected::farms::list_soil_tests).post(protected::farms::create_soil_test),
        )
        .route(
            "/api/farms/:id/crops/:crop_id",
            post(protected::farms::plant_crop).delete(protected::farms::unplant_crop),
        )
        // Crop catalog
        .route(
            "/api/crops",
            get(protected::crops::list_crops).post(protected::crops::create_crop),
        )
        .route("/api/crops/diseases", post(protected::crops::create_disease))
        .route("/api/crops/:id", get(protected::crops::get_crop))
        .route("/api/crops/:id/diseases", get(protected::crops::list_diseases))
        // Market data
        .route("/api/market/prices/current", get(protected::market::current_prices))
        .route(
            "/api/market/prices/history/:crop_id",
            get(protected::market::price_history),
        )
        .route("/api/market/prices", post(protected::market::create_price))
        .route("/api/market/markets", get(protected::market::list_markets))
        .route("/api/market/trends/:crop_id", get(protected::market::price_trends))
        // Weather
        .route("/api/weather", post(protected::weather::create_record))
        .route(
            "/api/weather/current/:location",
            get(protected::weather::current_weather),
        )
        .route("/api/weather/forecast/:location", get(protected::weather::forecast))
        .route("/api/weather/history/:location", get(protected::weather::history))
        .route(
            "/api/weather/trend/:location",
            get(protected::weather::temperature_trend),
        )
        .route("/api/weather/live", get(protected::weather::live_current))
        .route(
            "/api/weather/live/forecast",
            get(protected::weather::live_forecast),
        )
        // Guards: authentication runs first, then the active-account check
        .layer(axum_middleware::from_fn(middleware::auth::require_active))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        // Public auth routes (token acquisition)
        .route("/api/auth/register", post(public::auth::register))
        .route("/api/auth/token", post(public::auth::login))
        .merge(protected_routes)
        // Global middleware
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Fasal API",
            "version": version,
            "description": "Agricultural management platform backend",
            "endpoints": {
                "health": "/api/health (public)",
                "auth": "/api/auth/register, /api/auth/token (public), /api/auth/me (protected)",
                "farms": "/api/farms[/:id] (protected, owner-scoped)",
                "crops": "/api/crops[/:id] (protected)",
                "market": "/api/market/* (protected)",
                "weather": "/api/weather/* (protected)"
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<axum::response::Json<serde_json::Value>, error::ApiError> {
    database::health_check(&state.pool).await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        error::ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}

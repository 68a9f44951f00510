use fasal_api::{app, config::AppConfig, database, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = database::connect(&config.database_url)
        .await
        .unwrap_or_else(|e| panic!("failed to open database {}: {}", config.database_url, e));

    let bind_addr = format!("{}:{}", config.bind_host, config.bind_port);
    let state = AppState::new(config, pool);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Fasal API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}

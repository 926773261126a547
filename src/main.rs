use std::sync::Arc;

use share_a_meal_api::config;
use share_a_meal_api::server::{app, AppState};
use share_a_meal_api::store::{memory::MemoryStore, mysql::MySqlStore, Store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();

    let store: Arc<dyn Store> = match &config.database.url {
        Some(url) => {
            let store = MySqlStore::connect(url)
                .await
                .unwrap_or_else(|e| panic!("failed to connect to database: {e}"));
            tracing::info!("using MySQL store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let app = app(AppState::new(store));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("Share a Meal API listening on http://{bind_addr}");
    axum::serve(listener, app).await.expect("server");
}

use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use inkwell_account::config::AccountConfig;
use inkwell_account::router::build_router;
use inkwell_account::state::AppState;
use inkwell_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AccountConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::new();

    let addr = format!("0.0.0.0:{}", config.account_port);
    let state = AppState {
        db,
        redis,
        http,
        config: Arc::new(config),
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("account service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

use sea_orm::Database;
use tracing::info;

use couplet_pairing::config::PairingConfig;
use couplet_pairing::router::build_router;
use couplet_pairing::state::AppState;

#[tokio::main]
async fn main() {
    couplet_core::tracing::init_tracing();

    let config = PairingConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState::new(db);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.pairing_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("pairing service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

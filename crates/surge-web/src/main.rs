use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use surge_core::auth::TokenSource;
use surge_core::config::ServiceConfig;
use surge_core::db::{self, DbSecret, PgClientStore};
use surge_core::secrets::SecretsClient;
use surge_web::handlers::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServiceConfig::from_env()?;

    // The pool is built once here, before the listener binds. Requests never
    // initialize shared state.
    info!("Starting database connection...");
    let secrets = SecretsClient::new(TokenSource::Gcp);
    let payload = secrets
        .access_secret_version(&config.project_id, &config.secret_name, "latest")
        .await?;
    let secret = DbSecret::from_payload(&payload)?;
    let pool = db::connect_pool(&secret, config.max_connections).await?;

    let state = AppState::new(Arc::new(PgClientStore::new(pool)));
    let router = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

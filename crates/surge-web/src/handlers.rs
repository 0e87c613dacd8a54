use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tower_http::trace::TraceLayer;
use tracing::error;

use surge_core::db::ClientStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ClientStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/update_client/{client_id}", post(update_client))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Lookup, encode, write. An absent row is a 404; a store failure on either
/// side is a 500.
async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> (StatusCode, String) {
    let account_number = match state.store.account_number(client_id).await {
        Ok(Some(account_number)) => account_number,
        Ok(None) => return not_found(client_id),
        Err(e) => {
            error!("Error retrieving client with ID {}: {}", client_id, e);
            return server_error(client_id);
        }
    };

    let encoded = STANDARD.encode(account_number.as_bytes());

    match state.store.write_encoded(client_id, &encoded).await {
        Ok(true) => (
            StatusCode::OK,
            format!("Successfully updated base64 for clientId: {client_id}"),
        ),
        // Row vanished between lookup and write.
        Ok(false) => not_found(client_id),
        Err(e) => {
            error!("Error updating client with ID {}: {}", client_id, e);
            server_error(client_id)
        }
    }
}

fn not_found(client_id: i64) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Client with ID {client_id} not found."),
    )
}

fn server_error(client_id: i64) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to update base64 for clientId: {client_id}"),
    )
}

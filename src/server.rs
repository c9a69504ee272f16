use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;
use tracing::info;

use crate::{api, types::AuthorizationState};

pub fn router(state: Arc<Mutex<Option<AuthorizationState>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the callback routes on `addr` until the task is dropped.
pub async fn start_api_server(
    addr: &str,
    state: Arc<Mutex<Option<AuthorizationState>>>,
) -> Result<(), String> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("invalid server address '{}': {}", addr, e))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("cannot bind {}: {}", addr, e))?;
    info!(%addr, "callback server listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| e.to_string())
}

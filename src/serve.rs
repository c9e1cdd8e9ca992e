//! Thin HTTP surface over the board-listing endpoint.

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::{
    client::{BoardClient, DEFAULT_API_BASE},
    error::{PinwallError, PinwallResult},
};

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct ApiConfig {
    pub api_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
        }
    }
}

pub fn router(config: ApiConfig) -> Router {
    Router::new()
        .route("/boards", get(list_boards))
        .with_state(config)
}

pub async fn serve(addr: SocketAddr, config: ApiConfig) -> PinwallResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PinwallError::http(format!("bind {addr}: {e}")))?;
    tracing::info!(%addr, "serving moodboard API");
    axum::serve(listener, router(config))
        .await
        .map_err(|e| PinwallError::http(format!("serve: {e}")))
}

async fn list_boards(State(config): State<ApiConfig>, headers: HeaderMap) -> Response {
    let Some(key) = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|k| !k.is_empty())
        .map(str::to_owned)
    else {
        return (
            StatusCode::BAD_REQUEST,
            format!("missing {API_KEY_HEADER} header"),
        )
            .into_response();
    };

    // The board client is blocking; keep it off the async workers.
    let api_base = config.api_base.clone();
    let result = tokio::task::spawn_blocking(move || {
        BoardClient::new(Some(key))
            .with_api_base(api_base)
            .list_boards()
    })
    .await;

    match result {
        Ok(Ok(boards)) => Json(serde_json::json!({ "boards": boards })).into_response(),
        Ok(Err(err)) => {
            tracing::error!(error = %err, "board listing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("listing task failed: {err}"),
        )
            .into_response(),
    }
}

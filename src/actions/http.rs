//! HTTP transport for actions.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /actions/:action` - dispatch an action. Body = JSON data, request headers become the session.
//! - `GET /health` - returns `{ "ok": true, "actions": [...] }`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::service::{ActionResponse, ActionService};
use super::session::Session;
use crate::access::IdentityProvider;
use crate::backend::ShowBackend;

/// Build an axum `Router` that dispatches actions via the given service.
pub fn router<B, I>(service: Arc<ActionService<B, I>>) -> Router
where
    B: ShowBackend + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route("/health", get(health_handler::<B, I>))
        .route("/actions/:action", post(action_handler::<B, I>))
        .with_state(service)
}

/// Serve the actions over HTTP at the given address (e.g. `"127.0.0.1:8000"`).
pub async fn serve<B, I>(service: Arc<ActionService<B, I>>, addr: &str) -> Result<(), std::io::Error>
where
    B: ShowBackend + 'static,
    I: IdentityProvider + 'static,
{
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving show actions");
    axum::serve(listener, app).await
}

async fn health_handler<B, I>(State(service): State<Arc<ActionService<B, I>>>) -> impl IntoResponse
where
    B: ShowBackend + 'static,
    I: IdentityProvider + 'static,
{
    Json(json!({ "ok": true, "actions": service.actions() }))
}

async fn action_handler<B, I>(
    State(service): State<Arc<ActionService<B, I>>>,
    Path(action): Path<String>,
    headers: HeaderMap,
    Json(data): Json<Value>,
) -> impl IntoResponse
where
    B: ShowBackend + 'static,
    I: IdentityProvider + 'static,
{
    let session = session_from_headers(&headers);
    match service.dispatch(&action, data, session) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            let response = ActionResponse::from_error(&e);
            let status =
                StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(response.body)).into_response()
        }
    }
}

/// Every header becomes a session variable under its lowercase name.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = std::collections::HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}

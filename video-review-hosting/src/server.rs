//! Signed-upload credential endpoint.
//!
//! `GET /api/uploads` returns `{ "timestamp": .., "signature": .. }`.
//! Any other method gets `405` with `Allow: GET`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::signing::CredentialSigner;

/// Build the credential router.
pub fn router(signer: Arc<CredentialSigner>) -> Router {
    Router::new()
        .route("/api/uploads", get(create_upload).fallback(method_not_allowed))
        .with_state(signer)
}

/// Serve the credential router on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, signer: Arc<CredentialSigner>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("credential endpoint listening on http://{}/api/uploads", addr);
    }
    axum::serve(listener, router(signer)).await
}

async fn create_upload(State(signer): State<Arc<CredentialSigner>>) -> Response {
    match signer.issue() {
        Ok(credential) => {
            log::debug!("issued upload credential for timestamp {}", credential.timestamp);
            Json(credential).into_response()
        }
        Err(e) => {
            log::error!("request error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Error creating upload" })),
            )
                .into_response()
        }
    }
}

async fn method_not_allowed(method: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        format!("Method {} Not Allowed", method),
    )
        .into_response()
}

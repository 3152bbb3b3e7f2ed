//! Pull-side HTTP handlers.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/status.json` | Latest status snapshot |
//! | any | anything else | `404` with an empty body |
//!
//! The status handler reads the snapshot store only, so it keeps
//! answering even when every push subscriber is stalled.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::state::AppState;

/// Content type of the status document.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Serve the latest snapshot byte for byte.
///
/// # Route
///
/// `GET /status.json`
pub async fn status_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.store.current();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
        snapshot.body().to_owned(),
    )
}

/// Fallback for every unmatched path.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

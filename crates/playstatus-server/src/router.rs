//! Axum router construction for the status server.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete router.
///
/// - `GET /status.json` -- latest snapshot
/// - `GET /socket` -- `WebSocket` snapshot push
/// - anything else -- `404`, empty body
///
/// CORS allows any origin so browser overlays served from elsewhere can
/// poll and subscribe.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/status.json", get(handlers::status_json))
        .route("/socket", get(ws::ws_status))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Axum router configuration
//!
//! ```text
//! /
//! ├── /features   GET, POST
//! ├── /apply      POST
//! ├── /meta       GET
//! ├── /health     GET
//! └── /api/*      same routes, for the browser client
//! ```

use super::handlers::{apply_changes, describe_repo, get_features, health, update_features};
use super::state::AppState;
use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use std::time::Instant;
use tracing::{Instrument, info, info_span};

/// Build the complete router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/features", get(get_features).post(update_features))
        .route("/apply", post(apply_changes))
        .route("/meta", get(describe_repo))
        .route("/health", get(health));

    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}

async fn trace_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let span = info_span!("http.request", method = %method, path = %path);
    let response = next.run(request).instrument(span).await;

    info!(
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "{} {}",
        method,
        path
    );
    response
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matcher::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Matcher API
        .route(
            "/api/matcher/match",
            post(handlers::handle_match).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

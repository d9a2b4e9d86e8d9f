//! HTTP surface of the conversion service.
//!
//! Separated from `main.rs` so that the router can be exercised in tests
//! without a TCP listener.

pub mod error;
pub mod handlers;
pub mod pages;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by every handler.
pub struct AppState {
    /// Landing page, rendered once at startup.
    pub landing_page: String,
}

/// Build the application router with CORS open to any origin.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/data", post(handlers::convert_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{self, AppState};

/// Build the axum router with all catalog endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/files", get(handler::read_files))
        .route("/update-item", post(handler::update_item))
        .route("/add-item", post(handler::add_item))
        .route("/upload-asset", post(handler::upload_asset))
        .route("/health", get(handler::health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.allow_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Leafscan endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/predict", post(handler::predict_handler))
        .route("/v1/api/predict", post(handler::api_predict_handler))
        .route("/v1/dashboard", get(handler::dashboard_handler))
        .route("/v1/records", get(handler::records_handler))
        .route("/v1/ledger", get(handler::ledger_handler))
        .route("/v1/ledger/blocks/:index", get(handler::block_handler))
        .route("/v1/ledger/seal", post(handler::seal_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

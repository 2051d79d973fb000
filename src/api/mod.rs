pub mod detail;
pub mod health;
pub mod search;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use serde_json::json;

use crate::openlibrary::UpstreamError;
use crate::state::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/search", get(search::search_books))
        .route("/detail", get(detail::detail_by_query))
        // Path-embedded form, e.g. /works/OL45883W
        .route("/*work_key", get(detail::detail_by_path))
        .with_state(state)
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        let status = match self {
            UpstreamError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::services;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub id: Option<String>,
}

/// Query-parameter form: `/detail?id=/works/OL45883W`.
pub async fn detail_by_query(
    State(state): State<AppState>,
    Query(params): Query<DetailParams>,
) -> Response {
    let id = params.id.unwrap_or_default();
    let id = id.trim();
    if id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing id parameter" })),
        )
            .into_response();
    }
    detail_impl(&state, id).await
}

/// Path-embedded form: `/works/OL45883W`.
pub async fn detail_by_path(
    State(state): State<AppState>,
    Path(work_key): Path<String>,
) -> Response {
    detail_impl(&state, &work_key).await
}

async fn detail_impl(state: &AppState, id: &str) -> Response {
    match services::detail::detail(state, id).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => e.into_response(),
    }
}

//! Full-text search pass-through.

use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search terms, in the upstream's query syntax.
    pub query: Option<String>,
}

impl SearchParams {
    /// The query if it has any non-blank content.
    pub fn terms(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }
}

/// GET /search/?query=q - Upstream search results, byte for byte.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Response> {
    let terms = params
        .terms()
        .ok_or_else(|| ApiError::BadRequest("query parameter is required".to_string()))?;

    let results = state.upstream().search_raw(terms).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        Body::from(results.body),
    )
        .into_response())
}

/// Build search routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search/", get(search))
        .route("/search", get(search))
}

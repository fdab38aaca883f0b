//! Note and image endpoints.
//!
//! - GET /id/{id} - Note body, rewritten for the browser and decorated
//! - GET /image/{id} - Resource bytes as served by the upstream

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::error::ApiResult;
use crate::state::AppState;

/// Content type of a rendered note.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Fallback when the upstream does not name a resource's type.
const OCTET_STREAM: &str = "application/octet-stream";

/// GET /id/{id} - Decorated, rewritten Markdown of one note.
async fn get_note(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let document = state.upstream().fetch_note_document(&id).await?;

    tracing::debug!(note_id = %document.id, title = %document.title, "Serving note");

    Ok((
        [(header::CONTENT_TYPE, MARKDOWN_CONTENT_TYPE)],
        document.rewritten_body,
    )
        .into_response())
}

/// GET /image/{id} - Resource bytes with the upstream content type.
async fn get_image(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let resource = state.upstream().fetch_resource(&id).await?;

    let content_type = resource
        .content_type
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(resource.content_length),
    );

    Ok((headers, Body::from(resource.body)).into_response())
}

/// Build note routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/id/{id}", get(get_note))
        .route("/image/{id}", get(get_image))
}

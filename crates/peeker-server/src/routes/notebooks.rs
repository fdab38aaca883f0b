//! Notebook endpoints.
//!
//! - GET /notebooks/ - Complete notebook tree under the synthetic root
//! - GET /notebook/{id} - Notes directly inside one notebook

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use peeker_core::{NoteSummary, NotebookNode};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /notebooks/ - Notebook tree.
async fn get_notebook_tree(State(state): State<AppState>) -> ApiResult<Json<NotebookNode>> {
    let tree = state.upstream().fetch_notebook_tree().await?;
    Ok(Json(tree))
}

/// GET /notebook/{id} - `{id, title}` of each note in the notebook.
async fn list_notebook_notes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<NoteSummary>>> {
    let notes = state.upstream().fetch_notebook_notes(&id).await?;
    tracing::debug!(notebook_id = %id, count = notes.len(), "Listed notebook notes");
    Ok(Json(notes))
}

/// Build notebook routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notebooks/", get(get_notebook_tree))
        .route("/notebooks", get(get_notebook_tree))
        .route("/notebook/{id}", get(list_notebook_notes))
}

//! Route definitions for the gateway.

pub mod health;
pub mod notebooks;
pub mod notes;
pub mod search;
pub mod static_files;

use axum::Router;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(health::routes())
        .merge(notes::routes())
        .merge(search::routes())
        .merge(notebooks::routes())
        .merge(static_files::routes(&static_dir))
        .fallback_service(static_files::index_page(&static_dir))
        .with_state(state)
}

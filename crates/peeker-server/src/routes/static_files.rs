//! Browser front-end: index page, favicon and the static directory.
//!
//! Paths no other route claims (client-side routes such as `/note/{id}`) get
//! the index page, which then loads the content it needs from the API.

use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// The front-end's single page.
pub fn index_page(static_dir: &Path) -> ServeFile {
    ServeFile::new(static_dir.join("index.html"))
}

/// Build static file routes rooted at `static_dir`.
pub fn routes(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .route_service("/", index_page(static_dir))
        .route_service(
            "/favicon.ico",
            ServeFile::new(static_dir.join("img").join("favicon.ico")),
        )
        .nest_service("/static", ServeDir::new(static_dir))
}

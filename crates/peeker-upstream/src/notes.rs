//! Single-note assembly, resource pass-through and search.

use std::sync::LazyLock;

use peeker_core::{NoteDocument, rewrite};
use reqwest::Url;
use serde_json::Value;

use crate::client::{RawResponse, UpstreamClient, display_path};
use crate::error::{UpstreamError, UpstreamResult};

/// Fields requested for a displayed note.
pub const NOTE_FIELDS: &str = "title,body";

/// Fields requested for each search hit.
pub const SEARCH_FIELDS: &str = "id,title";

const HOME_LINK: &str = "<a href='/'>\
<img src='/static/img/home.png' width='20px' height='20px' alt='Joplin Peeker Home'/> \
Home</a>";

const SEPARATOR: &str = "   |   ";

static OPEN_NOTE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("joplin://x-callback-url/openNote").expect("invalid open-note url")
});

/// Deep link that opens a note in the desktop application.
///
/// The id is form-encoded into the query, so it cannot close the `href`.
pub fn open_in_app_link(note_id: &str) -> String {
    let mut url = OPEN_NOTE_URL.clone();
    url.query_pairs_mut().append_pair("id", note_id);
    format!(
        "<a href='{url}'>\
<img src='/static/img/joplin_logo.png' width='20px' height='20px' alt='Joplin Logo'/> \
Open in Joplin</a>"
    )
}

/// Wrap an already rewritten body in navigation links, above and below.
pub fn decorate(note_id: &str, body: &str) -> String {
    let nav = format!("{HOME_LINK}{SEPARATOR}{}", open_in_app_link(note_id));
    format!("{nav}\n\n{body}\n\n{nav}")
}

impl UpstreamClient {
    /// Fetch one note and prepare it for display.
    ///
    /// A response without a string `body` is a protocol error; a missing
    /// `title` is tolerated.
    pub async fn fetch_note_document(&self, note_id: &str) -> UpstreamResult<NoteDocument> {
        let segments = ["notes", note_id];
        let note: Value = self.get_json(&segments, &[("fields", NOTE_FIELDS)]).await?;

        let body = note
            .get("body")
            .and_then(Value::as_str)
            .ok_or_else(|| UpstreamError::MalformedResponse {
                path: display_path(&segments),
                field: "body",
            })?;
        let title = note
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(NoteDocument {
            id: note_id.to_string(),
            title: title.to_string(),
            rewritten_body: decorate(note_id, &rewrite(body)),
        })
    }

    /// Fetch the bytes of a resource (image or attachment).
    pub async fn fetch_resource(&self, resource_id: &str) -> UpstreamResult<RawResponse> {
        self.get_raw(&["resources", resource_id, "file"], &[]).await
    }

    /// Run a full-text search and return the upstream JSON untouched.
    pub async fn search_raw(&self, query: &str) -> UpstreamResult<RawResponse> {
        self.get_raw(&["search"], &[("query", query), ("fields", SEARCH_FIELDS)])
            .await
    }
}

//! Notebook listings: sequential pagination and tree assembly.

use peeker_core::{NoteSummary, NotebookNode, NotebookRecord, Page, build_tree};
use serde::de::DeserializeOwned;

use crate::client::{UpstreamClient, display_path};
use crate::error::{UpstreamError, UpstreamResult};

/// Fields requested for each notebook.
pub const NOTEBOOK_FIELDS: &str = "id,title,parent_id";

/// Fields requested for each note in a listing.
pub const NOTE_SUMMARY_FIELDS: &str = "id,title";

impl UpstreamClient {
    /// Fetch every item of a paginated listing.
    ///
    /// Pages are requested one after another starting at 1, and page N+1 is
    /// only requested once page N has been decoded. Stops at the first page
    /// with `has_more == false`, or fails once `max_pages` pages have all
    /// claimed more results.
    pub async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        fields: &str,
    ) -> UpstreamResult<Vec<T>> {
        let max_pages = self.config().max_pages;
        let mut items = Vec::new();

        for page in 1..=max_pages {
            let page_number = page.to_string();
            let response: Page<T> = self
                .get_json(segments, &[("page", &page_number), ("fields", fields)])
                .await?;
            items.extend(response.items);

            if !response.has_more {
                tracing::debug!(
                    path = %display_path(segments),
                    pages = page,
                    items = items.len(),
                    "Listing complete"
                );
                return Ok(items);
            }
        }

        Err(UpstreamError::RunawayPagination {
            path: display_path(segments),
            max_pages,
        })
    }

    /// Fetch the complete flat notebook list.
    pub async fn fetch_all_notebooks(&self) -> UpstreamResult<Vec<NotebookRecord>> {
        self.fetch_all_pages(&["folders"], NOTEBOOK_FIELDS).await
    }

    /// Fetch all notebooks and arrange them under the synthetic root.
    pub async fn fetch_notebook_tree(&self) -> UpstreamResult<NotebookNode> {
        let records = self.fetch_all_notebooks().await?;
        let tree = build_tree(&records);

        let attached = tree.node_count() - 1;
        if attached < records.len() {
            tracing::debug!(
                records = records.len(),
                attached,
                "Notebooks with unknown or cyclic parents, or nested too deep, left out of the tree"
            );
        }
        Ok(tree)
    }

    /// Fetch `{id, title}` of every note directly inside one notebook.
    pub async fn fetch_notebook_notes(&self, notebook_id: &str) -> UpstreamResult<Vec<NoteSummary>> {
        self.fetch_all_pages(&["folders", notebook_id, "notes"], NOTE_SUMMARY_FIELDS)
            .await
    }
}

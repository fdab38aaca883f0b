//! Data model for notebooks and notes as seen by the gateway.
//!
//! Upstream records are decoded leniently: absent or `null` fields become
//! their defaults (empty string, zero) so that one sloppy record never fails
//! a whole listing. Listing pages, on the other hand, must carry both `items`
//! and `has_more`; a page without them is a protocol violation that the
//! upstream layer reports.

use serde::{Deserialize, Deserializer, Serialize};

/// Reserved ID of the synthetic root notebook.
///
/// Upstream IDs are 32-character hex strings, so the underscores keep the
/// sentinel out of the upstream ID space.
pub const ROOT_ID: &str = "_root_";

/// Decode `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Notebooks
// ============================================================================

/// A notebook as returned by the upstream `/folders` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookRecord {
    /// Upstream-assigned notebook ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Parent notebook ID; empty for top-level notebooks.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_id: String,
    /// Number of notes directly in this notebook, when the upstream reports it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub note_count: u32,
}

impl NotebookRecord {
    /// Creates a record with no note count.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        parent_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent_id: parent_id.into(),
            note_count: 0,
        }
    }

    /// Sets the note count.
    #[must_use]
    pub fn with_note_count(mut self, note_count: u32) -> Self {
        self.note_count = note_count;
        self
    }

    /// Returns the parent ID with the empty parent mapped to [`ROOT_ID`].
    pub fn normalized_parent_id(&self) -> &str {
        if self.parent_id.is_empty() {
            ROOT_ID
        } else {
            &self.parent_id
        }
    }
}

/// A notebook in the materialized hierarchy.
///
/// Serializes as `{id, title, parent_id, n_children, children}`, the shape
/// the browser front-end walks to draw the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookNode {
    pub id: String,
    pub title: String,
    /// ID of the parent node; [`ROOT_ID`] for top-level notebooks and empty
    /// for the root itself.
    pub parent_id: String,
    /// Notes directly in this notebook. Never aggregated over descendants.
    #[serde(rename = "n_children")]
    pub note_count: u32,
    /// Child notebooks ordered by title.
    pub children: Vec<NotebookNode>,
}

impl NotebookNode {
    /// Creates the synthetic root with no children.
    pub fn root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            title: ROOT_ID.to_string(),
            parent_id: String::new(),
            note_count: 0,
            children: Vec::new(),
        }
    }

    /// Returns true if this is the synthetic root.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NotebookNode::node_count)
            .sum::<usize>()
    }

    /// Depth-first search for a node by ID.
    pub fn find(&self, id: &str) -> Option<&NotebookNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

// ============================================================================
// Notes
// ============================================================================

/// A note reference as returned by search and notebook listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// A note ready for display through the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDocument {
    /// Upstream note ID.
    pub id: String,
    /// Note title, empty if the upstream omitted it.
    pub title: String,
    /// Rewritten body wrapped in navigation links.
    pub rewritten_body: String,
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of an upstream listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_upstream_shape() {
        let json = r#"{"id":"abc","title":"Work","parent_id":"def"}"#;
        let record: NotebookRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, NotebookRecord::new("abc", "Work", "def"));
    }

    #[test]
    fn record_missing_and_null_fields_default() {
        let record: NotebookRecord = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.parent_id, "");
        assert_eq!(record.note_count, 0);

        let record: NotebookRecord =
            serde_json::from_str(r#"{"id":"abc","title":null,"parent_id":null,"note_count":null}"#)
                .unwrap();
        assert_eq!(record, NotebookRecord::new("abc", "", ""));
    }

    #[test]
    fn record_keeps_note_count() {
        let record: NotebookRecord =
            serde_json::from_str(r#"{"id":"abc","title":"t","parent_id":"","note_count":7}"#)
                .unwrap();
        assert_eq!(record.note_count, 7);
    }

    #[test]
    fn normalized_parent_maps_empty_to_root() {
        assert_eq!(NotebookRecord::new("a", "A", "").normalized_parent_id(), ROOT_ID);
        assert_eq!(NotebookRecord::new("a", "A", "p").normalized_parent_id(), "p");
    }

    #[test]
    fn node_serializes_gateway_shape() {
        let node = NotebookNode {
            id: "a".to_string(),
            title: "Work".to_string(),
            parent_id: ROOT_ID.to_string(),
            note_count: 3,
            children: vec![],
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a",
                "title": "Work",
                "parent_id": "_root_",
                "n_children": 3,
                "children": []
            })
        );
    }

    #[test]
    fn root_node_shape() {
        let root = NotebookNode::root();
        assert!(root.is_root());
        assert_eq!(root.title, ROOT_ID);
        assert_eq!(root.parent_id, "");
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn page_requires_has_more() {
        let result: Result<Page<NoteSummary>, _> = serde_json::from_str(r#"{"items":[]}"#);
        assert!(result.is_err());

        let page: Page<NoteSummary> =
            serde_json::from_str(r#"{"items":[{"id":"n1","title":"One"}],"has_more":true}"#)
                .unwrap();
        assert!(page.has_more);
        assert_eq!(page.items[0].id, "n1");
    }
}

//! Notebook hierarchy reconstruction.
//!
//! The upstream lists notebooks flat, each pointing at its parent. The tree
//! is rebuilt top-down from the synthetic root using two lookups:
//!
//! - ID to record, which also rejects duplicate and sentinel IDs
//! - parent ID to child records, in input order, with `""` filed under
//!   [`ROOT_ID`]
//!
//! Materialization only ever follows parent-to-child edges starting at the
//! root. A record whose parent is unknown, or that sits on a parent cycle,
//! is simply never reached and does not appear in the output. Neither is a
//! notebook nested deeper than [`MAX_DEPTH`] levels below the root, which
//! bounds the recursion of building, serializing and dropping the tree.

use std::collections::HashMap;

use crate::types::{NotebookNode, NotebookRecord, ROOT_ID};

/// Deepest level materialized; top-level notebooks are at depth 1.
pub const MAX_DEPTH: usize = 256;

type ChildMap<'a> = HashMap<&'a str, Vec<&'a NotebookRecord>>;

/// Build the notebook tree rooted at the synthetic [`ROOT_ID`] node.
///
/// Children at every level are ordered by title, comparing bytes
/// (case-sensitive), with ties kept in input order. Subtrees below
/// [`MAX_DEPTH`] are left out.
pub fn build_tree(records: &[NotebookRecord]) -> NotebookNode {
    let mut by_id: HashMap<&str, &NotebookRecord> = HashMap::with_capacity(records.len() + 1);
    let root_record = NotebookRecord::new(ROOT_ID, ROOT_ID, "");
    by_id.insert(ROOT_ID, &root_record);

    let mut children: ChildMap<'_> = HashMap::new();
    for record in records {
        // First occurrence wins; a record claiming the sentinel ID is dropped.
        if by_id.contains_key(record.id.as_str()) {
            continue;
        }
        by_id.insert(record.id.as_str(), record);
        children
            .entry(record.normalized_parent_id())
            .or_default()
            .push(record);
    }

    let mut root = NotebookNode::root();
    root.children = materialize_children(ROOT_ID, 1, &mut children);
    root
}

/// Materialize the ordered children of `parent_id`, which sit at `depth`.
///
/// Each child list is removed from the map as it is consumed, so no list is
/// ever expanded twice.
fn materialize_children(
    parent_id: &str,
    depth: usize,
    children: &mut ChildMap<'_>,
) -> Vec<NotebookNode> {
    if depth > MAX_DEPTH {
        return Vec::new();
    }
    let Some(mut records) = children.remove(parent_id) else {
        return Vec::new();
    };
    records.sort_by(|a, b| a.title.cmp(&b.title));

    let mut nodes = Vec::with_capacity(records.len());
    for record in records {
        nodes.push(NotebookNode {
            id: record.id.clone(),
            title: record.title.clone(),
            parent_id: record.normalized_parent_id().to_string(),
            note_count: record.note_count,
            children: materialize_children(&record.id, depth + 1, children),
        });
    }
    nodes
}

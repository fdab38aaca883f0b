//! peeker-core: pure data transformations for the Joplin Peeker gateway
//!
//! This crate provides:
//! - The notebook and note data model shared by the upstream client and the
//!   HTTP gateway
//! - [`build_tree`]: reshapes a flat notebook listing into an ordered tree
//! - [`rewrite`]: turns the upstream's `:/<id>` internal references into
//!   gateway-relative links
//!
//! Nothing in this crate performs I/O and nothing in it can fail. Malformed
//! input degrades to "no substitution" (rewriter) or "record omitted" (tree).
//!
//! # Usage
//!
//! ```rust
//! use peeker_core::{NotebookRecord, build_tree, rewrite};
//!
//! let tree = build_tree(&[NotebookRecord::new("a", "Work", "")]);
//! assert_eq!(tree.children.len(), 1);
//!
//! assert_eq!(rewrite("[agenda](:/abc)"), "[agenda](/id/abc)");
//! ```

pub mod markdown;
pub mod tree;
pub mod types;

pub use markdown::rewrite;
pub use tree::{MAX_DEPTH, build_tree};
pub use types::{NoteDocument, NoteSummary, NotebookNode, NotebookRecord, Page, ROOT_ID};

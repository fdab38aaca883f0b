//! peeker-upstream: access to the Joplin data API for the Peeker gateway
//!
//! This crate provides:
//! - [`UpstreamClient`], a GET-only client with per-call timeout, retries on
//!   transient failures and token forwarding
//! - Sequential pagination with a hard page limit
//! - Assembly of the notebook tree and of displayable note documents
//! - Pass-through of resource bytes and search results
//!
//! # Usage
//!
//! ```rust,ignore
//! use peeker_upstream::{UpstreamClient, UpstreamConfig};
//!
//! let client = UpstreamClient::new(UpstreamConfig::new("http://localhost:41184", token))?;
//!
//! let tree = client.fetch_notebook_tree().await?;
//! let note = client.fetch_note_document("0123456789abcdef0123456789abcdef").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod notebooks;
pub mod notes;

pub use client::{RawResponse, UpstreamClient};
pub use config::UpstreamConfig;
pub use error::{UpstreamError, UpstreamErrorKind, UpstreamResult};

// Re-export peeker-core for downstream crates
pub use peeker_core;

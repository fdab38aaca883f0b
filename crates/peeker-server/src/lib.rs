//! peeker-server: read-only web gateway for a Joplin note server
//!
//! This crate provides:
//! - Browser endpoints for notes, images, search and the notebook tree
//! - The static front-end (index page, scripts, icons)
//! - Configuration from flags, environment and `config.json`
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON error responses
//!
//! # Usage
//!
//! ```rust,ignore
//! use clap::Parser;
//! use peeker_server::{config::{Args, ServerConfig}, routes, AppState};
//!
//! let config = ServerConfig::load(Args::parse())?;
//! let app = routes::build_router(AppState::new(config)?);
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

// Re-export dependent crates
pub use peeker_core;
pub use peeker_upstream;

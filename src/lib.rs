//! # rxiv-scout
//!
//! An MCP (Model Context Protocol) server for searching bioRxiv and
//! medRxiv preprints, with a relevance ranker layered over an upstream API
//! that only supports date-range listing and exact-DOI lookup.
//!
//! ## Architecture
//!
//! - [`models`]: core data structures (Preprint, SearchQuery, SearchResult)
//! - [`rxiv`]: the upstream details-API client with retry/backoff
//! - [`search`]: category resolution, relevance scoring, and the search
//!   pipeline with fallback broadening
//! - [`assets`]: static asset index over local files
//! - [`mcp`]: MCP protocol implementation and server
//! - [`utils`]: HTTP client, retry, validation and formatting helpers
//! - [`config`]: configuration management

pub mod assets;
pub mod config;
pub mod mcp;
pub mod models;
pub mod rxiv;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use models::{Preprint, SearchQuery, SearchResult};
pub use rxiv::{ApiError, RxivClient, Server};
pub use search::SearchEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

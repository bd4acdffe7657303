//! Utility modules supporting the preprint client:
//!
//! - [`HttpClient`]: shared HTTP client with sensible defaults
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff around transient
//!   upstream failures
//! - [`validate_date`], [`validate_identifier`], [`extract_doi`]: strict
//!   input validation for dates, DOIs and cursors
//! - [`format`]: caller-facing text rendering for tool responses

pub mod format;
mod http;
mod retry;
mod validate;

pub use http::HttpClient;
pub use retry::{with_retry, RetryConfig};
pub use validate::{
    extract_doi, parse_cursor, validate_date, validate_identifier, validate_query,
    ValidationError,
};

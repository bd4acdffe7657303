//! Client for the bioRxiv/medRxiv details API.
//!
//! Both servers expose the same API under different hosts: date-range
//! listing and exact-DOI lookup, nothing else. There is no native full-text
//! search; the [`crate::search`] module builds one on top of this client.

use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use crate::config::ApiConfig;
use crate::models::Preprint;
use crate::utils::{with_retry, HttpClient, RetryConfig, ValidationError};

/// Default base URL for the primary (bioRxiv) collection.
pub const BIORXIV_API_URL: &str = "https://api.biorxiv.org";

/// Default base URL for the secondary (medRxiv) collection.
pub const MEDRXIV_API_URL: &str = "https://api.medrxiv.org";

/// The two upstream preprint collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Server {
    /// Primary collection (biology)
    BioRxiv,
    /// Secondary collection (medicine)
    MedRxiv,
}

impl Server {
    /// Path segment naming this collection in the API.
    pub fn name(&self) -> &'static str {
        match self {
            Server::BioRxiv => "biorxiv",
            Server::MedRxiv => "medrxiv",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Server::BioRxiv => "bioRxiv",
            Server::MedRxiv => "medRxiv",
        }
    }
}

impl std::fmt::Display for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors raised by the upstream client and the search engine around it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed caller input; never sent upstream
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP 429; transient, retried
    #[error("Rate limit exceeded (HTTP 429)")]
    RateLimit,

    /// HTTP 5xx; transient, retried
    #[error("Upstream server error (HTTP {0})")]
    ServerError(u16),

    /// Any other non-success status; fails immediately
    #[error("Unexpected upstream status (HTTP {0})")]
    Http(u16),

    /// Well-formed 200 response carrying an embedded error status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Connection-level failure; fails immediately
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed response body
    #[error("Parse error: {0}")]
    Parse(String),

    /// Record or resource missing
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    /// Whether this failure may clear up on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::RateLimit | ApiError::ServerError(_))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

/// Response envelope shared by listing and lookup endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    #[serde(default)]
    pub collection: Vec<Preprint>,
}

/// Status block preceding the collection.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub cursor: Option<serde_json::Value>,
}

impl Envelope {
    /// Application-level error embedded in an otherwise successful
    /// response, if any.
    fn error_message(&self) -> Option<String> {
        let first = self.messages.first()?;
        if first.status.eq_ignore_ascii_case("error") {
            Some(
                first
                    .text
                    .clone()
                    .unwrap_or_else(|| "upstream reported an error".to_string()),
            )
        } else {
            None
        }
    }
}

/// Issues GET requests against the details API with retry-with-backoff.
///
/// Retries cover HTTP 429 and 5xx only; everything else fails on first
/// sight. The backoff baseline resets on every call, so a busy client's
/// timing never degrades across calls.
#[derive(Debug, Clone)]
pub struct RxivClient {
    http: HttpClient,
    retry: RetryConfig,
    biorxiv_base: String,
    medrxiv_base: String,
}

impl RxivClient {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = HttpClient::new(std::time::Duration::from_secs(config.timeout_secs))
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            retry: config.retry_config(),
            biorxiv_base: config.biorxiv_url.clone(),
            medrxiv_base: config.medrxiv_url.clone(),
        })
    }

    /// Create a client against explicit base URLs (used by tests).
    pub fn with_base_urls(
        primary: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::new(std::time::Duration::from_secs(30))
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            retry: RetryConfig::default(),
            biorxiv_base: primary.into(),
            medrxiv_base: secondary.into(),
        })
    }

    /// Replace the retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn base_url(&self, server: Server) -> &str {
        match server {
            Server::BioRxiv => &self.biorxiv_base,
            Server::MedRxiv => &self.medrxiv_base,
        }
    }

    /// Fetch one page of the date-range listing.
    ///
    /// The numeric cursor offset rides in the trailing path segment;
    /// `category` and `limit` go in the query string.
    pub async fn fetch_listing(
        &self,
        server: Server,
        from: NaiveDate,
        to: NaiveDate,
        offset: usize,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Envelope, ApiError> {
        let mut url = Url::parse(&format!(
            "{}/details/{}/{}/{}/{}",
            self.base_url(server),
            server.name(),
            from,
            to,
            offset
        ))
        .map_err(|e| ApiError::InvalidRequest(format!("bad listing URL: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = category {
                pairs.append_pair("category", category);
            }
            pairs.append_pair("limit", &limit.to_string());
        }

        tracing::debug!("listing {} {}..{} offset {}", server, from, to, offset);
        self.execute(url).await
    }

    /// Look up a single record by DOI.
    pub async fn fetch_by_doi(&self, server: Server, doi: &str) -> Result<Envelope, ApiError> {
        // The DOI's slash is a literal path separator in this API.
        let url = Url::parse(&format!(
            "{}/details/{}/{}/na/json",
            self.base_url(server),
            server.name(),
            doi
        ))
        .map_err(|e| ApiError::InvalidRequest(format!("bad lookup URL: {e}")))?;

        tracing::debug!("lookup {} on {}", doi, server);
        self.execute(url).await
    }

    /// Execute a GET with retry, then classify the response.
    async fn execute(&self, url: Url) -> Result<Envelope, ApiError> {
        let client = self.http.client().clone();

        let response = with_retry(self.retry, || {
            let client = client.clone();
            let url = url.clone();
            async move {
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| ApiError::Network(e.to_string()))?;

                let status = response.status();
                if status.as_u16() == 429 {
                    return Err(ApiError::RateLimit);
                }
                if status.is_server_error() {
                    return Err(ApiError::ServerError(status.as_u16()));
                }
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ApiError::NotFound("no such record or interval".to_string()));
                }
                if !status.is_success() {
                    return Err(ApiError::Http(status.as_u16()));
                }

                Ok(response)
            }
        })
        .await?;

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("failed to parse envelope: {e}")))?;

        // A 200 carrying an embedded error is a failure, not a retry.
        if let Some(message) = envelope.error_message() {
            return Err(ApiError::Upstream(message));
        }

        Ok(envelope)
    }
}

//! Search engine over the details API.
//!
//! The upstream exposes no full-text search, only date-range listing and
//! exact-DOI lookup. [`SearchEngine`] turns a free-text query into a
//! relevance-ranked result: resolve a category and server, fetch one
//! listing page, score and filter it, and broaden to a wider window plus
//! the secondary collection only when the first pass comes back empty.

pub mod categories;
pub mod scorer;

use chrono::{Datelike, NaiveDate, Utc};

use crate::models::{Preprint, SearchQuery, SearchResult, MAX_LIMIT};
use crate::rxiv::{ApiError, RxivClient, Server};
use crate::utils::{extract_doi, parse_cursor, validate_query};

pub use categories::{catalog, resolve, Category, ResolvedQuery};

/// Years of history searched when the caller gives no dates.
const DEFAULT_WINDOW_YEARS: i32 = 5;

/// Start of the widened window used by fallback broadening; predates the
/// first preprints on the primary server.
fn fallback_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2013, 1, 1).expect("static date")
}

/// Outcome of ranking one fetched collection.
#[derive(Debug)]
enum StageOutcome {
    /// At least one record survived scoring
    Ranked(Vec<Preprint>),
    /// Everything scored zero (or the page was empty)
    Empty,
}

/// Score and filter a raw collection against the query text.
fn evaluate(collection: Vec<Preprint>, query_text: &str) -> StageOutcome {
    let ranked = scorer::rank(collection, query_text);
    if ranked.is_empty() {
        StageOutcome::Empty
    } else {
        StageOutcome::Ranked(ranked)
    }
}

/// Trailing window ending `today` when the caller supplies no dates.
fn default_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = today
        .with_year(today.year() - DEFAULT_WINDOW_YEARS)
        .unwrap_or(today - chrono::Days::new(365 * DEFAULT_WINDOW_YEARS as u64));
    (from, today)
}

/// Merge fallback collections, keeping the first record per DOI.
fn merge_by_doi(primary: Vec<Preprint>, secondary: Vec<Preprint>) -> Vec<Preprint> {
    let mut seen = std::collections::HashSet::new();
    primary
        .into_iter()
        .chain(secondary)
        .filter(|record| seen.insert(record.doi.to_lowercase()))
        .collect()
}

/// Drives one search call end to end.
///
/// The stages run sequentially; a later stage only runs when the earlier
/// ones were exhausted. Transient upstream failures inside any listing
/// stage propagate as the call's failure; only a failed DOI lookup is
/// swallowed, falling through to category search.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    client: RxivClient,
}

impl SearchEngine {
    /// Create an engine over the given client.
    pub fn new(client: RxivClient) -> Self {
        Self { client }
    }

    /// Execute a search and return the ranked, filtered result.
    ///
    /// An empty result is not an error; it reports `total == 0`.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, ApiError> {
        validate_query(&query.text)?;
        let offset = parse_cursor(query.cursor.as_deref())?;
        let limit = query.limit.clamp(1, MAX_LIMIT);

        let today = Utc::now().date_naive();
        let (default_from, default_to) = default_window(today);
        let from = query.from_date.unwrap_or(default_from);
        let to = query.to_date.unwrap_or(default_to);

        // Direct lookup supersedes everything when the query carries a DOI.
        // A miss here is deliberately non-fatal.
        if let Some(doi) = extract_doi(&query.text) {
            match self.lookup(&doi).await {
                Ok(records) if !records.is_empty() => {
                    tracing::debug!("direct lookup hit for {}", doi);
                    let records = records.into_iter().take(limit).collect();
                    return Ok(SearchResult::new(records, offset));
                }
                Ok(_) => {
                    tracing::debug!("direct lookup empty for {}, trying category search", doi);
                }
                Err(error) => {
                    tracing::debug!(
                        "direct lookup failed for {}: {}, trying category search",
                        doi,
                        error
                    );
                }
            }
        }

        // Primary fetch against the resolved server and category.
        let resolved = categories::resolve(&query.text);
        let envelope = self
            .client
            .fetch_listing(resolved.server, from, to, offset, Some(&resolved.category), limit)
            .await?;

        if let StageOutcome::Ranked(records) = evaluate(envelope.collection, &query.text) {
            let records = records.into_iter().take(limit).collect();
            return Ok(SearchResult::new(records, offset));
        }

        tracing::debug!("primary fetch empty for '{}', broadening", query.text);

        // Fallback broadening: widened window on the primary collection,
        // default window on the secondary, raw query as category.
        let merged = self
            .broaden(&query.text, default_from, default_to, today, offset, limit)
            .await?;

        match evaluate(merged, &query.text) {
            StageOutcome::Ranked(records) => {
                let records = records.into_iter().take(limit).collect();
                Ok(SearchResult::new(records, offset))
            }
            StageOutcome::Empty => Ok(SearchResult::new(Vec::new(), offset)),
        }
    }

    /// The two broadened listing requests, queried sequentially; merge
    /// order is primary first, so it stays deterministic.
    async fn broaden(
        &self,
        text: &str,
        default_from: NaiveDate,
        default_to: NaiveDate,
        today: NaiveDate,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Preprint>, ApiError> {
        let category = text.trim().to_lowercase().replace(' ', "_");

        let wide = self
            .client
            .fetch_listing(
                Server::BioRxiv,
                fallback_epoch(),
                today,
                offset,
                Some(&category),
                limit,
            )
            .await?;

        let secondary = self
            .client
            .fetch_listing(
                Server::MedRxiv,
                default_from,
                default_to,
                offset,
                Some(&category),
                limit,
            )
            .await?;

        Ok(merge_by_doi(wide.collection, secondary.collection))
    }

    /// Look a DOI up on the primary collection, then the secondary.
    pub async fn lookup(&self, doi: &str) -> Result<Vec<Preprint>, ApiError> {
        match self.client.fetch_by_doi(Server::BioRxiv, doi).await {
            Ok(envelope) if !envelope.collection.is_empty() => Ok(envelope.collection),
            Ok(_) | Err(ApiError::NotFound(_)) => {
                let envelope = self.client.fetch_by_doi(Server::MedRxiv, doi).await?;
                Ok(envelope.collection)
            }
            Err(error) => Err(error),
        }
    }

    /// Fetch full metadata for one identifier, or `None` when no server
    /// knows it.
    pub async fn details(&self, identifier: &str) -> Result<Option<Preprint>, ApiError> {
        let doi = crate::utils::validate_identifier(identifier)?;
        match self.lookup(&doi).await {
            Ok(records) => Ok(records.into_iter().next()),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }
}

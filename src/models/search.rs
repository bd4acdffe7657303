//! Search request and result models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Preprint;

/// Default number of records returned per search.
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound on records per search.
pub const MAX_LIMIT: usize = 100;

/// Search query parameters.
///
/// `text` is the only required field; absent dates default to a 5-year
/// trailing window ending today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query string
    pub text: String,

    /// Start of the date range (inclusive)
    pub from_date: Option<NaiveDate>,

    /// End of the date range (inclusive)
    pub to_date: Option<NaiveDate>,

    /// Maximum number of results to return (1..=100)
    pub limit: usize,

    /// Opaque pagination cursor (a numeric offset string)
    pub cursor: Option<String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            from_date: None,
            to_date: None,
            limit: DEFAULT_LIMIT,
            cursor: None,
        }
    }
}

impl SearchQuery {
    /// Create a new query for the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the start date.
    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    /// Set the end date.
    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }

    /// Set the result limit, clamped to 1..=100.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Set the pagination cursor.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

/// Result of one search call.
///
/// Constructed fresh per call; `records` is sorted by descending relevance
/// and every record scored above zero. `total` counts the filtered set, not
/// what the upstream paging reported. `next_cursor` is derived and
/// advisory: filtering changes the apparent result count from what upstream
/// paging would say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching records, best first
    pub records: Vec<Preprint>,

    /// Number of records after filtering
    pub total: usize,

    /// Offset cursor for the next page
    pub next_cursor: String,
}

impl SearchResult {
    /// Build a result from the filtered records and the requested offset.
    ///
    /// Copies only the fields of the result structure; nothing from the
    /// upstream envelope leaks through.
    pub fn new(records: Vec<Preprint>, offset: usize) -> Self {
        let total = records.len();
        Self {
            records,
            total,
            next_cursor: (offset + total).to_string(),
        }
    }

    /// Whether the search matched anything.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Advisory display window `[cursor - count + 1, cursor]`, 1-based.
    ///
    /// May not exactly reflect true upstream paging once filtering has
    /// altered the set size.
    pub fn display_window(&self) -> Option<(usize, usize)> {
        if self.total == 0 {
            return None;
        }
        let end: usize = self.next_cursor.parse().ok()?;
        Some((end + 1 - self.total, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new("CRISPR").limit(25).cursor("30");
        assert_eq!(query.text, "CRISPR");
        assert_eq!(query.limit, 25);
        assert_eq!(query.cursor.as_deref(), Some("30"));
        assert!(query.from_date.is_none());
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(SearchQuery::new("x").limit(0).limit, 1);
        assert_eq!(SearchQuery::new("x").limit(500).limit, MAX_LIMIT);
    }

    #[test]
    fn test_result_cursor_and_total() {
        let records = vec![Preprint::new("10.1101/a", "A"), Preprint::new("10.1101/b", "B")];
        let result = SearchResult::new(records, 10);
        assert_eq!(result.total, 2);
        assert_eq!(result.next_cursor, "12");
        assert_eq!(result.display_window(), Some((11, 12)));
    }

    #[test]
    fn test_empty_result() {
        let result = SearchResult::new(Vec::new(), 0);
        assert_eq!(result.total, 0);
        assert_eq!(result.next_cursor, "0");
        assert!(result.is_empty());
        assert_eq!(result.display_window(), None);
    }
}

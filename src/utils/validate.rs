//! Input validation for dates, identifiers and cursors.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Validation error types.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Query text must not be empty")]
    EmptyQuery,

    #[error("Invalid identifier '{0}': {1}")]
    InvalidIdentifier(String, String),

    #[error("Invalid cursor '{0}': expected a numeric offset")]
    InvalidCursor(String),
}

fn date_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"))
}

fn doi_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"10\.\d{4,9}/[^\s]+").expect("valid regex"))
}

/// Validate a date string against the strict `YYYY-MM-DD` pattern.
///
/// The shape check alone would accept "2023-13-40"; the calendar parse
/// rejects it.
pub fn validate_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let text = text.trim();
    if !date_shape().is_match(text) {
        return Err(ValidationError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(text.to_string()))
}

/// Reject empty or whitespace-only query text.
pub fn validate_query(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(())
}

/// Validate and canonicalize a record identifier.
///
/// Accepts a bare DOI or one wearing a `doi:`/`https://doi.org/` prefix;
/// the canonical form is lowercase with the prefix stripped.
pub fn validate_identifier(id: &str) -> Result<String, ValidationError> {
    let id = id.trim().to_lowercase();

    if id.is_empty() {
        return Err(ValidationError::InvalidIdentifier(
            id,
            "empty identifier".to_string(),
        ));
    }

    let doi = id.strip_prefix("doi:").unwrap_or(&id);
    let doi = doi.strip_prefix("https://doi.org/").unwrap_or(doi);
    let doi = doi.strip_prefix("http://doi.org/").unwrap_or(doi);

    if !doi.starts_with("10.") {
        return Err(ValidationError::InvalidIdentifier(
            id.clone(),
            "must start with '10.'".to_string(),
        ));
    }

    if !doi.contains('/') {
        return Err(ValidationError::InvalidIdentifier(
            id.clone(),
            "missing '/' separator".to_string(),
        ));
    }

    Ok(doi.to_string())
}

/// Extract the first DOI-shaped token from free text, if any.
pub fn extract_doi(text: &str) -> Option<String> {
    doi_shape()
        .find(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ')']).to_lowercase())
}

/// Parse an optional cursor string into a numeric offset (default 0).
pub fn parse_cursor(cursor: Option<&str>) -> Result<usize, ValidationError> {
    match cursor {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidCursor(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date_valid() {
        assert_eq!(
            validate_date("2023-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_validate_date_rejects_bad_shape() {
        assert!(validate_date("2023/02/28").is_err());
        assert!(validate_date("23-02-28").is_err());
        assert!(validate_date("2023-2-8").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_date_rejects_impossible_calendar_dates() {
        assert!(validate_date("2023-13-40").is_err());
        assert!(validate_date("2023-02-30").is_err());
        assert!(validate_date("2023-00-01").is_err());
    }

    #[test]
    fn test_validate_query() {
        assert!(validate_query("CRISPR").is_ok());
        assert!(validate_query("").is_err());
        assert!(validate_query("   ").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert_eq!(
            validate_identifier("10.1101/2020.01.30.927871").unwrap(),
            "10.1101/2020.01.30.927871"
        );
        assert_eq!(
            validate_identifier("doi:10.1101/ABC").unwrap(),
            "10.1101/abc"
        );
        assert_eq!(
            validate_identifier("https://doi.org/10.1101/xyz").unwrap(),
            "10.1101/xyz"
        );
    }

    #[test]
    fn test_validate_identifier_rejects_malformed() {
        // No separator character
        assert!(validate_identifier("10.1101").is_err());
        assert!(validate_identifier("not-a-doi/at-all").is_err());
        assert!(validate_identifier("").is_err());
    }

    #[test]
    fn test_extract_doi() {
        assert_eq!(
            extract_doi("see 10.1101/2020.01.30.927871 for details").as_deref(),
            Some("10.1101/2020.01.30.927871")
        );
        assert_eq!(
            extract_doi("(10.1101/2021.01.01.425001)").as_deref(),
            Some("10.1101/2021.01.01.425001")
        );
        assert_eq!(extract_doi("CRISPR gene editing"), None);
    }

    #[test]
    fn test_parse_cursor() {
        assert_eq!(parse_cursor(None).unwrap(), 0);
        assert_eq!(parse_cursor(Some("30")).unwrap(), 30);
        assert!(parse_cursor(Some("abc")).is_err());
        assert!(parse_cursor(Some("-1")).is_err());
    }
}

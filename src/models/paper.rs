//! Preprint model as served by the bioRxiv/medRxiv details API.

use serde::{Deserialize, Serialize};

/// A single preprint record.
///
/// Deserialized verbatim from the upstream `collection` array; records are
/// never mutated after parsing, only filtered and reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprint {
    /// Digital Object Identifier (e.g. "10.1101/2020.01.30.927871")
    #[serde(default)]
    pub doi: String,

    /// Preprint title
    #[serde(default)]
    pub title: String,

    /// Authors (semicolon-separated, as the upstream reports them)
    #[serde(default)]
    pub authors: String,

    /// Corresponding author name
    #[serde(default)]
    pub author_corresponding: Option<String>,

    /// Corresponding author's institution
    #[serde(default)]
    pub author_corresponding_institution: Option<String>,

    /// Abstract text
    #[serde(default, rename = "abstract")]
    pub r#abstract: String,

    /// Posting date (ISO format)
    #[serde(default)]
    pub date: String,

    /// Subject category assigned by the server
    #[serde(default)]
    pub category: Option<String>,

    /// Submission type (e.g. "new results")
    #[serde(default, rename = "type")]
    pub r#type: Option<String>,

    /// Revision number
    #[serde(default)]
    pub version: Option<String>,

    /// DOI of the published journal version, when one exists
    #[serde(default)]
    pub published: Option<String>,

    /// License the preprint was posted under
    #[serde(default)]
    pub license: Option<String>,
}

impl Preprint {
    /// Create a preprint with the required fields.
    pub fn new(doi: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            title: title.into(),
            authors: String::new(),
            author_corresponding: None,
            author_corresponding_institution: None,
            r#abstract: String::new(),
            date: String::new(),
            category: None,
            r#type: None,
            version: None,
            published: None,
            license: None,
        }
    }

    /// Set authors (builder style).
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }

    /// Set the abstract (builder style).
    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.r#abstract = text.into();
        self
    }

    /// Set the posting date (builder style).
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Set the category (builder style).
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the corresponding author (builder style).
    pub fn corresponding(mut self, name: impl Into<String>) -> Self {
        self.author_corresponding = Some(name.into());
        self
    }

    /// Set the corresponding institution (builder style).
    pub fn institution(mut self, name: impl Into<String>) -> Self {
        self.author_corresponding_institution = Some(name.into());
        self
    }

    /// Canonical resolver link for this record.
    pub fn url(&self) -> String {
        format!("https://doi.org/{}", self.doi)
    }

    /// Author names as a vector.
    pub fn author_list(&self) -> Vec<&str> {
        self.authors
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Whether the upstream reports a published journal version.
    ///
    /// The API uses the literal string "NA" for unpublished records.
    pub fn is_published(&self) -> bool {
        self.published
            .as_deref()
            .is_some_and(|p| !p.is_empty() && !p.eq_ignore_ascii_case("na"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_url() {
        let paper = Preprint::new("10.1101/2020.01.30.927871", "Test Preprint")
            .authors("Doe, J.; Smith, A.")
            .abstract_text("A test abstract.")
            .date("2020-01-30")
            .category("genomics");

        assert_eq!(paper.doi, "10.1101/2020.01.30.927871");
        assert_eq!(paper.url(), "https://doi.org/10.1101/2020.01.30.927871");
        assert_eq!(paper.author_list(), vec!["Doe, J.", "Smith, A."]);
        assert_eq!(paper.category.as_deref(), Some("genomics"));
    }

    #[test]
    fn test_deserialize_upstream_record() {
        let json = r#"{
            "doi": "10.1101/2021.03.01.433384",
            "title": "CRISPR screening in stem cells",
            "authors": "Lee, K.; Park, H.",
            "author_corresponding": "Lee, K.",
            "author_corresponding_institution": "Example University",
            "date": "2021-03-01",
            "version": "2",
            "type": "new results",
            "license": "cc_by",
            "category": "genomics",
            "abstract": "We screen things.",
            "published": "NA"
        }"#;

        let paper: Preprint = serde_json::from_str(json).unwrap();
        assert_eq!(paper.title, "CRISPR screening in stem cells");
        assert_eq!(paper.r#abstract, "We screen things.");
        assert_eq!(paper.version.as_deref(), Some("2"));
        assert!(!paper.is_published());
    }

    #[test]
    fn test_missing_fields_default() {
        let paper: Preprint = serde_json::from_str(r#"{"doi": "10.1101/x", "title": "T"}"#).unwrap();
        assert!(paper.authors.is_empty());
        assert!(paper.category.is_none());
        assert!(!paper.is_published());
    }
}

//! Caller-facing text rendering for tool and CLI output.

use crate::models::{Preprint, SearchResult};
use crate::search::catalog;

/// Longest abstract snippet shown in a result listing.
const SNIPPET_LEN: usize = 240;

/// Truncate text to `max_chars`, appending an ellipsis when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Render a ranked result set as readable text.
pub fn search_results(result: &SearchResult, query: &str) -> String {
    if result.is_empty() {
        return no_results(query);
    }

    let mut out = String::new();
    match result.display_window() {
        Some((start, end)) => out.push_str(&format!(
            "Found {} preprint(s) matching \"{}\" (showing {}-{}):\n\n",
            result.total, query, start, end
        )),
        None => out.push_str(&format!(
            "Found {} preprint(s) matching \"{}\":\n\n",
            result.total, query
        )),
    }

    for (index, record) in result.records.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, record.title));
        if !record.authors.is_empty() {
            out.push_str(&format!("   Authors: {}\n", record.authors));
        }
        let mut meta = vec![format!("Date: {}", record.date)];
        if let Some(category) = &record.category {
            meta.push(format!("Category: {}", category));
        }
        out.push_str(&format!("   {}\n", meta.join(" | ")));
        out.push_str(&format!("   DOI: {} ({})\n", record.doi, record.url()));
        if !record.r#abstract.is_empty() {
            out.push_str(&format!(
                "   {}\n",
                truncate_with_ellipsis(&record.r#abstract, SNIPPET_LEN)
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!("Next cursor: {}\n", result.next_cursor));
    out
}

/// The "no results" message with guidance, never an error.
pub fn no_results(query: &str) -> String {
    format!(
        "No preprints found for \"{}\".\n\n\
         Suggestions:\n\
         - try broader or alternative keywords\n\
         - widen the date range (from_date / to_date)\n\
         - browse subject areas with list_categories and search by one\n\
         - if you have a DOI (10.xxxx/...), pass it directly for an exact lookup\n",
        query
    )
}

/// Render a single record in full.
pub fn preprint_details(record: &Preprint) -> String {
    let mut out = String::new();
    out.push_str(&format!("Title: {}\n", record.title));
    if !record.authors.is_empty() {
        out.push_str(&format!("Authors: {}\n", record.authors));
    }
    if let Some(corresponding) = &record.author_corresponding {
        out.push_str(&format!("Corresponding author: {}", corresponding));
        if let Some(institution) = &record.author_corresponding_institution {
            out.push_str(&format!(" ({})", institution));
        }
        out.push('\n');
    }
    out.push_str(&format!("Date: {}\n", record.date));
    if let Some(category) = &record.category {
        out.push_str(&format!("Category: {}\n", category));
    }
    if let Some(kind) = &record.r#type {
        out.push_str(&format!("Type: {}\n", kind));
    }
    if let Some(version) = &record.version {
        out.push_str(&format!("Version: {}\n", version));
    }
    if let Some(license) = &record.license {
        out.push_str(&format!("License: {}\n", license));
    }
    if record.is_published() {
        if let Some(published) = &record.published {
            out.push_str(&format!("Published as: https://doi.org/{}\n", published));
        }
    }
    out.push_str(&format!("DOI: {} ({})\n", record.doi, record.url()));
    if !record.r#abstract.is_empty() {
        out.push_str(&format!("\nAbstract:\n{}\n", record.r#abstract));
    }
    out
}

/// The "record not found" message.
pub fn not_found(identifier: &str) -> String {
    format!(
        "No preprint found for identifier \"{}\" on either server.\n\
         Check the DOI, or use search_preprints for a keyword search.\n",
        identifier
    )
}

/// Render the fixed category catalog.
pub fn category_list() -> String {
    let mut out = String::from("Available subject categories:\n\n");
    for category in catalog() {
        out.push_str(&format!(
            "- {} ({})\n",
            category.display_name, category.machine_name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello...");
    }

    #[test]
    fn test_search_results_lists_records() {
        let records = vec![
            Preprint::new("10.1101/a", "CRISPR alpha").date("2024-01-01"),
            Preprint::new("10.1101/b", "CRISPR beta").date("2024-01-02"),
        ];
        let text = search_results(&SearchResult::new(records, 0), "CRISPR");
        assert!(text.contains("Found 2 preprint(s)"));
        assert!(text.contains("1. CRISPR alpha"));
        assert!(text.contains("https://doi.org/10.1101/b"));
        assert!(text.contains("Next cursor: 2"));
    }

    #[test]
    fn test_empty_result_gives_suggestions() {
        let text = search_results(&SearchResult::new(Vec::new(), 0), "xyzzy");
        assert!(text.contains("No preprints found"));
        assert!(text.contains("Suggestions:"));
    }

    #[test]
    fn test_details_includes_metadata() {
        let record = Preprint::new("10.1101/x", "A Title")
            .authors("Doe, J.")
            .corresponding("Doe, J.")
            .institution("Example University")
            .date("2023-05-01")
            .category("genomics")
            .abstract_text("Body text.");
        let text = preprint_details(&record);
        assert!(text.contains("Title: A Title"));
        assert!(text.contains("Corresponding author: Doe, J. (Example University)"));
        assert!(text.contains("Category: genomics"));
        assert!(text.contains("Abstract:\nBody text."));
    }

    #[test]
    fn test_category_list_is_complete() {
        let text = category_list();
        assert!(text.contains("Neuroscience (neuroscience)"));
        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 26);
    }
}

//! Hand-rolled relevance scorer.
//!
//! Weighted substring hits summed across fields. The weights are load
//! bearing: downstream ordering depends on their exact ratios, so they are
//! reproduced as-is rather than normalized.

use std::cmp::Ordering;

use crate::models::Preprint;

const TITLE_EXACT: f64 = 100.0;
const TITLE_WORD: f64 = 10.0;
const ABSTRACT_EXACT: f64 = 50.0;
const ABSTRACT_WORD: f64 = 5.0;
const CATEGORY_EXACT: f64 = 40.0;
const CATEGORY_WORD: f64 = 4.0;
const AUTHORS_EXACT: f64 = 30.0;
const AUTHORS_WORD: f64 = 3.0;
const DOI_EXACT: f64 = 25.0;
const CORRESPONDING_EXACT: f64 = 20.0;
const CORRESPONDING_WORD: f64 = 2.0;
const INSTITUTION_EXACT: f64 = 15.0;
const INSTITUTION_WORD: f64 = 1.5;

/// Minimum word length to participate in per-word matching (exclusive).
const MIN_WORD_LEN: usize = 2;

/// Lowercased query words eligible for per-word matching.
pub fn query_words(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_WORD_LEN)
        .map(|w| w.to_lowercase())
        .collect()
}

/// Exact-plus-per-word hits on a single field.
fn field_score(value: &str, query_lower: &str, words: &[String], exact: f64, per_word: f64) -> f64 {
    let value = value.to_lowercase();
    let mut score = 0.0;
    if value.contains(query_lower) {
        score += exact;
    }
    if per_word > 0.0 {
        for word in words {
            if value.contains(word.as_str()) {
                score += per_word;
            }
        }
    }
    score
}

/// Score a record against a query. Always non-negative, never capped.
pub fn score(record: &Preprint, query_lower: &str, words: &[String]) -> f64 {
    let mut total = 0.0;

    total += field_score(&record.title, query_lower, words, TITLE_EXACT, TITLE_WORD);
    total += field_score(
        &record.r#abstract,
        query_lower,
        words,
        ABSTRACT_EXACT,
        ABSTRACT_WORD,
    );
    if let Some(category) = &record.category {
        total += field_score(category, query_lower, words, CATEGORY_EXACT, CATEGORY_WORD);
    }
    total += field_score(
        &record.authors,
        query_lower,
        words,
        AUTHORS_EXACT,
        AUTHORS_WORD,
    );
    total += field_score(&record.doi, query_lower, words, DOI_EXACT, 0.0);
    if let Some(corresponding) = &record.author_corresponding {
        total += field_score(
            corresponding,
            query_lower,
            words,
            CORRESPONDING_EXACT,
            CORRESPONDING_WORD,
        );
    }
    if let Some(institution) = &record.author_corresponding_institution {
        total += field_score(
            institution,
            query_lower,
            words,
            INSTITUTION_EXACT,
            INSTITUTION_WORD,
        );
    }

    total
}

/// Score, drop zeros, and sort best-first.
///
/// The sort is stable: ties keep the order they arrived in the collection.
pub fn rank(records: Vec<Preprint>, query: &str) -> Vec<Preprint> {
    let query_lower = query.trim().to_lowercase();
    let words = query_words(query);

    let mut scored: Vec<(f64, Preprint)> = records
        .into_iter()
        .filter_map(|record| {
            let s = score(&record, &query_lower, &words);
            (s > 0.0).then_some((s, record))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(_, record)| record).collect()
}

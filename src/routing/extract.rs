//! Named extractors for the description sub-grammar.
//!
//! A description is free text that may contain:
//! - trigger phrases: any run of characters between a pair of double quotes
//! - an exclusion clause: `do not use for <words...>` up to the next period
//!   or the end of the text (case-insensitive)
//! - a topic sentence: the text before the first period, or the first
//!   100 characters when the description has no period at all
//!
//! Every extractor lower-cases its output so callers compare like with like.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Minimum length of a word that counts as a term.
pub const MIN_TERM_LEN: usize = 4;

/// Length of the topic sentence fallback when the description has no period.
pub const TOPIC_FALLBACK_CHARS: usize = 100;

static QUOTED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());

static EXCLUSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"do not use for (.+?)(?:\.|$)").unwrap());

static TERM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b\w{{{},}}\b", MIN_TERM_LEN)).unwrap());

/// All double-quoted trigger phrases, lower-cased, in order of appearance.
///
/// Quotes pair up left to right, so `"a" and "b"` yields `["a", "b"]`.
/// An unpaired trailing quote is ignored; empty quotes (`""`) are not phrases.
pub fn extract_quoted_phrases(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    QUOTED_RE
        .captures_iter(&lower)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// The body of the first `do not use for ...` clause, lower-cased.
///
/// The clause ends at the first period after the marker or at the end of the
/// text. Returns `None` when the description carries no such clause.
pub fn extract_exclusion_clause(description: &str) -> Option<String> {
    let lower = description.to_lowercase();
    EXCLUSION_RE
        .captures(&lower)
        .map(|caps| caps[1].to_string())
}

/// The first sentence of the description, lower-cased.
pub fn extract_topic_sentence(description: &str) -> String {
    let lower = description.to_lowercase();
    match lower.split_once('.') {
        Some((first, _)) => first.to_string(),
        None => lower.chars().take(TOPIC_FALLBACK_CHARS).collect(),
    }
}

/// Distinct lower-cased words of at least [`MIN_TERM_LEN`] word characters.
///
/// Word boundaries follow the regex `\b` rules, so `what's` contributes
/// `what` and `ci/cd` contributes nothing.
pub fn extract_terms(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    TERM_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_phrases_in_order() {
        let desc = r#"Use when user says "Build a RAG pipeline", "chunk documents" or "add vector search"."#;
        assert_eq!(
            extract_quoted_phrases(desc),
            vec!["build a rag pipeline", "chunk documents", "add vector search"]
        );
    }

    #[test]
    fn test_quoted_phrases_none() {
        assert!(extract_quoted_phrases("No quotes at all.").is_empty());
        assert!(extract_quoted_phrases("").is_empty());
    }

    #[test]
    fn test_quoted_phrases_unpaired_and_empty() {
        assert_eq!(extract_quoted_phrases(r#""one" and "dangling"#), vec!["one"]);
        assert!(extract_quoted_phrases(r#"empty "" quotes"#).is_empty());
    }

    #[test]
    fn test_exclusion_clause_until_period() {
        let desc = "Runs evals. Do NOT use for unit testing or mocking. Extra text.";
        assert_eq!(
            extract_exclusion_clause(desc).as_deref(),
            Some("unit testing or mocking")
        );
    }

    #[test]
    fn test_exclusion_clause_until_end() {
        let desc = "Runs evals. Do not use for deployment";
        assert_eq!(extract_exclusion_clause(desc).as_deref(), Some("deployment"));
    }

    #[test]
    fn test_exclusion_clause_first_only() {
        let desc = "A. Do not use for alpha work. Do not use for beta work.";
        assert_eq!(extract_exclusion_clause(desc).as_deref(), Some("alpha work"));
    }

    #[test]
    fn test_exclusion_clause_absent() {
        assert!(extract_exclusion_clause("Do not use this skill lightly.").is_none());
        assert!(extract_exclusion_clause("").is_none());
    }

    #[test]
    fn test_topic_sentence_first_period() {
        assert_eq!(
            extract_topic_sentence("Builds RAG pipelines. Use when asked."),
            "builds rag pipelines"
        );
    }

    #[test]
    fn test_topic_sentence_fallback_truncates() {
        let long = "x".repeat(150);
        assert_eq!(extract_topic_sentence(&long).len(), TOPIC_FALLBACK_CHARS);
        assert_eq!(extract_topic_sentence("Short text"), "short text");
    }

    #[test]
    fn test_topic_sentence_fallback_multibyte_no_panic() {
        let text = "é".repeat(120);
        assert_eq!(
            extract_topic_sentence(&text).chars().count(),
            TOPIC_FALLBACK_CHARS
        );
    }

    #[test]
    fn test_terms_min_length_and_dedup() {
        let terms = extract_terms("Build a RAG pipeline, build it with ChromaDB!");
        let expected: BTreeSet<String> = ["build", "pipeline", "with", "chromadb"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(terms, expected);
    }

    #[test]
    fn test_terms_apostrophe_splits_word() {
        let terms = extract_terms("What's the weather today?");
        assert!(terms.contains("what"));
        assert!(terms.contains("weather"));
        assert!(terms.contains("today"));
        assert!(!terms.iter().any(|t| t.contains('\'')));
    }

    #[test]
    fn test_terms_length_follows_min_term_len() {
        let short = "x".repeat(MIN_TERM_LEN - 1);
        let exact = "y".repeat(MIN_TERM_LEN);
        let terms = extract_terms(&format!("{} {}", short, exact));
        assert_eq!(terms.into_iter().collect::<Vec<_>>(), vec![exact]);
    }

    #[test]
    fn test_terms_empty() {
        assert!(extract_terms("").is_empty());
        assert!(extract_terms("a an the ci/cd").is_empty());
    }
}

//! Confidence scoring for one (prompt, description) pair.
//!
//! Three signals are computed over lower-cased text and summed:
//!
//! - **trigger phrases**: `3.0 * matched / total` for the quoted phrases of the
//!   description that occur verbatim in the prompt. Only active when the
//!   description quotes at least one phrase.
//! - **exclusion penalty**: `-1.0` per term shared by the prompt and the
//!   description's `do not use for ...` clause. Uncapped.
//! - **topic overlap**: `2.0 * min(overlap / 3, 1.0)` for terms shared by the
//!   prompt and the description's first sentence. Always active.
//!
//! The sum is divided by the weights of the active positive signals and
//! clamped to `[0.0, 1.0]`.

use serde::Serialize;
use tracing::trace;

use super::extract::{
    extract_exclusion_clause, extract_quoted_phrases, extract_terms, extract_topic_sentence,
};

pub const TRIGGER_WEIGHT: f64 = 3.0;
pub const TOPIC_WEIGHT: f64 = 2.0;
pub const EXCLUSION_PENALTY: f64 = 1.0;

/// Topic overlap at which the topic signal saturates.
pub const TOPIC_SATURATION: usize = 3;

/// Every intermediate value behind a score.
///
/// Only [`ScoreBreakdown::confidence`] is a routing contract; the raw sum may
/// be far below zero when an exclusion clause fires and carries no further
/// meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub trigger_phrases: Vec<String>,
    pub matched_phrases: Vec<String>,
    pub excluded_terms: Vec<String>,
    pub topic_terms: Vec<String>,
    pub raw: f64,
    pub max_possible: f64,
}

impl ScoreBreakdown {
    /// Normalized, clamped score in `[0.0, 1.0]`.
    pub fn confidence(&self) -> f64 {
        if self.max_possible <= 0.0 {
            return 0.0;
        }
        (self.raw / self.max_possible).clamp(0.0, 1.0)
    }

    pub fn trigger_signal(&self) -> f64 {
        if self.trigger_phrases.is_empty() {
            return 0.0;
        }
        TRIGGER_WEIGHT * (self.matched_phrases.len() as f64 / self.trigger_phrases.len() as f64)
    }

    pub fn exclusion_penalty(&self) -> f64 {
        EXCLUSION_PENALTY * self.excluded_terms.len() as f64
    }

    pub fn topic_signal(&self) -> f64 {
        let ratio = self.topic_terms.len() as f64 / TOPIC_SATURATION as f64;
        TOPIC_WEIGHT * ratio.min(1.0)
    }
}

/// Score `prompt` against `description`, returning a value in `[0.0, 1.0]`.
pub fn score(prompt: &str, description: &str) -> f64 {
    explain(prompt, description).confidence()
}

/// Score `prompt` against `description`, keeping every intermediate signal.
pub fn explain(prompt: &str, description: &str) -> ScoreBreakdown {
    let prompt_lower = prompt.to_lowercase();
    let prompt_terms = extract_terms(&prompt_lower);

    let mut breakdown = ScoreBreakdown::default();

    // Trigger phrases
    let phrases = extract_quoted_phrases(description);
    if !phrases.is_empty() {
        breakdown.matched_phrases = phrases
            .iter()
            .filter(|p| prompt_lower.contains(p.as_str()))
            .cloned()
            .collect();
        breakdown.trigger_phrases = phrases;
        breakdown.max_possible += TRIGGER_WEIGHT;
    }

    // Exclusion clause
    if let Some(clause) = extract_exclusion_clause(description) {
        breakdown.excluded_terms = extract_terms(&clause)
            .intersection(&prompt_terms)
            .cloned()
            .collect();
    }

    // Topic sentence
    let topic = extract_topic_sentence(description);
    breakdown.topic_terms = extract_terms(&topic)
        .intersection(&prompt_terms)
        .cloned()
        .collect();
    breakdown.max_possible += TOPIC_WEIGHT;

    breakdown.raw =
        breakdown.trigger_signal() - breakdown.exclusion_penalty() + breakdown.topic_signal();

    trace!(
        raw = breakdown.raw,
        max = breakdown.max_possible,
        "scored description"
    );

    breakdown
}

use tracing::debug;

use super::scorer;
use super::types::{RankedCandidates, ScoreResult, SkillDescriptor};

/// Results at or below this score are noise, not candidates.
pub const DEFAULT_MIN_SCORE: f64 = 0.05;

/// Scores every descriptor and ranks the ones above a minimum score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Router {
    min_score: f64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCORE)
    }
}

impl Router {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Rank `descriptors` for `prompt`.
    ///
    /// Only results strictly above the minimum score are kept. Equal scores
    /// keep the order in which the descriptors were supplied. An empty result
    /// means no descriptor is a confident match.
    pub fn route(&self, prompt: &str, descriptors: &[SkillDescriptor]) -> RankedCandidates {
        let mut results: Vec<ScoreResult> = descriptors
            .iter()
            .map(|d| ScoreResult::new(d.id(), scorer::score(prompt, d.description())))
            .filter(|r| r.score > self.min_score)
            .collect();

        // sort_by is stable
        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            "Routed prompt against {} descriptors: {} candidates",
            descriptors.len(),
            results.len()
        );

        RankedCandidates::from_ranked(results)
    }
}

/// Rank `descriptors` for `prompt` with the default minimum score.
pub fn route(prompt: &str, descriptors: &[SkillDescriptor]) -> RankedCandidates {
    Router::default().route(prompt, descriptors)
}

//! Value types shared by the scorer, router and classifier

use serde::Serialize;
use std::fmt;

/// A skill's identifier plus its natural-language description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDescriptor {
    id: String,
    description: String,
}

impl SkillDescriptor {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Confidence of one skill for one prompt, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub skill: String,
    pub score: f64,
}

impl ScoreResult {
    pub fn new(skill: impl Into<String>, score: f64) -> Self {
        Self {
            skill: skill.into(),
            score,
        }
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.skill, self.score)
    }
}

/// Router output: descending by score, ties kept in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedCandidates(Vec<ScoreResult>);

impl RankedCandidates {
    /// Wrap results that are already ranked.
    ///
    /// The router is the normal producer; this exists for callers that
    /// replay recorded scores through the classifier.
    pub fn from_ranked(results: Vec<ScoreResult>) -> Self {
        Self(results)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn top(&self) -> Option<&ScoreResult> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreResult> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ScoreResult] {
        &self.0
    }

    /// 1-based rank of `skill` within the first `n` candidates.
    pub fn rank_within(&self, skill: &str, n: usize) -> Option<usize> {
        self.0
            .iter()
            .take(n)
            .position(|r| r.skill == skill)
            .map(|i| i + 1)
    }

    pub fn into_vec(self) -> Vec<ScoreResult> {
        self.0
    }
}

impl<'a> IntoIterator for &'a RankedCandidates {
    type Item = &'a ScoreResult;
    type IntoIter = std::slice::Iter<'a, ScoreResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

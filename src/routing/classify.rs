use serde::Serialize;
use std::fmt;

use super::types::{RankedCandidates, ScoreResult};

/// Minimum lead rank 1 needs over rank 2 to be a confident pick.
pub const DEFAULT_AMBIGUITY_GAP: f64 = 0.15;

/// Outcome of inspecting the top of a ranked candidate list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing scored above the router threshold.
    NoMatch,
    /// Rank 1 and rank 2 are too close to call.
    Ambiguous {
        top: ScoreResult,
        runner_up: ScoreResult,
        gap: f64,
    },
    /// One candidate is confidently preferred.
    Resolved(ScoreResult),
}

impl Verdict {
    pub fn winner(&self) -> Option<&ScoreResult> {
        match self {
            Verdict::Resolved(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Verdict::Ambiguous { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NoMatch => write!(f, "no match"),
            Verdict::Ambiguous {
                top,
                runner_up,
                gap,
            } => write!(f, "ambiguous: {} vs {} (gap {:.2})", top, runner_up, gap),
            Verdict::Resolved(winner) => write!(f, "resolved: {}", winner),
        }
    }
}

/// Decides whether a ranked list has a clear winner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbiguityClassifier {
    gap: f64,
}

impl Default for AmbiguityClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_AMBIGUITY_GAP)
    }
}

impl AmbiguityClassifier {
    pub fn new(gap: f64) -> Self {
        Self { gap }
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Classify `ranked`, which must already be in descending score order.
    ///
    /// A lead strictly below the configured gap is ambiguous; a lead equal to
    /// or above it resolves to rank 1. A single candidate always resolves.
    pub fn classify(&self, ranked: &RankedCandidates) -> Verdict {
        match ranked.as_slice() {
            [] => Verdict::NoMatch,
            [top, runner_up, ..] if top.score - runner_up.score < self.gap => Verdict::Ambiguous {
                top: top.clone(),
                runner_up: runner_up.clone(),
                gap: top.score - runner_up.score,
            },
            [top, ..] => Verdict::Resolved(top.clone()),
        }
    }
}

/// Classify `ranked` with the default gap.
pub fn classify(ranked: &RankedCandidates) -> Verdict {
    AmbiguityClassifier::default().classify(ranked)
}

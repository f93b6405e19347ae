//! Prompt routing for skill descriptors.
//!
//! Given a free-text request and a set of skill descriptors, this module
//! scores each descriptor, ranks the ones above a minimum relevance score and
//! decides whether the top of the ranking is a clear winner:
//!
//! ```
//! use skillroute::routing::{classify, route, SkillDescriptor, Verdict};
//!
//! let skills = vec![SkillDescriptor::new(
//!     "building-rag-pipeline",
//!     r#"Build a RAG pipeline with retrieval. Use when user says "build a RAG pipeline"."#,
//! )];
//! let ranked = route("Build a RAG pipeline with ChromaDB", &skills);
//! assert!(matches!(classify(&ranked), Verdict::Resolved(_)));
//! ```
//!
//! Every function here is pure: no I/O, no shared state, identical inputs
//! always give identical outputs.

pub mod classify;
pub mod extract;
pub mod router;
pub mod scorer;
mod types;

pub use classify::{classify, AmbiguityClassifier, Verdict, DEFAULT_AMBIGUITY_GAP};
pub use router::{route, Router, DEFAULT_MIN_SCORE};
pub use scorer::{explain, score, ScoreBreakdown};
pub use types::{RankedCandidates, ScoreResult, SkillDescriptor};

//! skillroute - Route prompts to skills by description
//!
//! Scores a user prompt against every skill description in a SKILL.md library,
//! ranks the candidates, and decides whether one skill clearly wins or the
//! prompt needs a clarifying question. Also lints descriptions, validates the
//! library layout, and runs routing regression suites.

pub mod cli;
pub mod config;
pub mod lint;
pub mod report;
pub mod routing;
pub mod store;
pub mod suite;
pub mod validator;

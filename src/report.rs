//! Pass/warn/fail accumulator for library checks and regression suites.
//!
//! A `Report` is owned by whoever runs the checks and handed down by `&mut`;
//! nothing here is process-wide.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "PASS"),
            Status::Warn => write!(f, "WARN"),
            Status::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub status: Status,
    /// Group the check belongs to, e.g. "references" or "triggering"
    pub section: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    results: Vec<CheckResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: Status, section: &str, message: impl Into<String>) {
        self.results.push(CheckResult {
            status,
            section: section.to_string(),
            message: message.into(),
        });
    }

    pub fn pass(&mut self, section: &str, message: impl Into<String>) {
        self.record(Status::Pass, section, message);
    }

    pub fn warn(&mut self, section: &str, message: impl Into<String>) {
        self.record(Status::Warn, section, message);
    }

    pub fn fail(&mut self, section: &str, message: impl Into<String>) {
        self.record(Status::Fail, section, message);
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn count(&self, status: Status) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn has_failures(&self) -> bool {
        self.count(Status::Fail) > 0
    }

    /// Share of passing checks, in percent. An empty report has a 0% pass rate.
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.count(Status::Pass) as f64 / self.total() as f64 * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} warnings (total: {})",
            self.count(Status::Pass),
            self.count(Status::Fail),
            self.count(Status::Warn),
            self.total()
        )
    }

    /// Print results grouped by section, followed by the summary line.
    pub fn print(&self) {
        let mut current: Option<&str> = None;
        for result in &self.results {
            if current != Some(result.section.as_str()) {
                println!("\n== {} ==", result.section);
                current = Some(result.section.as_str());
            }
            let marker = match result.status {
                Status::Pass => "✅",
                Status::Warn => "⚠️ ",
                Status::Fail => "❌",
            };
            println!("  {} {}  {}", marker, result.status, result.message);
        }

        println!("\nResults: {}", self.summary());
        println!("Pass rate: {:.0}%", self.pass_rate());
    }
}

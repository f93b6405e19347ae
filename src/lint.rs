use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::routing::extract::extract_quoted_phrases;
use crate::store::parse_frontmatter;

static NEGATIVE_TRIGGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)do not use").unwrap());
static USAGE_CONTEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)use when|when user").unwrap());
static STEP_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"###\s*(Step\s+)?\d+").unwrap());
static WORKFLOW_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^#{1,3}\s+\w+.*(?:Workflow|Instructions|Process|Flow)").unwrap()
});
static NUMBERED_BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+\.\s+\*\*").unwrap());
static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\w*\n").unwrap());
static CHECKBOX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[ x]\]").unwrap());
static VERIFY_WORDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)verify|checklist|validation").unwrap());
static REFERENCE_ROUTING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:read|load|see).*reference").unwrap());

const MIN_DESCRIPTION_CHARS: usize = 20;
const RECOMMENDED_TRIGGER_PHRASES: usize = 3;
const MIN_DESCRIPTION_WORDS: usize = 15;
const RECOMMENDED_DESCRIPTION_WORDS: usize = 30;
const MIN_INSTRUCTION_LINES: usize = 15;
const RECOMMENDED_INSTRUCTION_LINES: usize = 30;

#[derive(Debug, Clone)]
pub struct LintIssue {
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Error, // Must fix
    Warning, // Should fix
    Info,    // Nice to have
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(()),
        }
    }
}

fn issue(severity: Severity, category: &str, message: String, suggestion: &str) -> LintIssue {
    LintIssue {
        severity,
        category: category.to_string(),
        message,
        suggestion: Some(suggestion.to_string()),
    }
}

/// Authoring checks for a single SKILL.md.
#[derive(Debug, Clone, Default)]
pub struct SkillLinter {
    /// Directory name -> frontmatter name accepted in place of the directory name
    name_aliases: HashMap<String, String>,
}

impl SkillLinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_aliases(mut self, aliases: HashMap<String, String>) -> Self {
        self.name_aliases = aliases;
        self
    }

    /// Lint the SKILL.md of the skill living in directory `skill`
    pub fn lint(&self, skill: &str, content: &str) -> Result<Vec<LintIssue>> {
        let mut issues = Vec::new();

        // Frontmatter and description
        issues.extend(self.check_frontmatter(skill, content));

        // Numbered workflow
        issues.extend(self.check_structure(content));

        // Examples, verification and depth
        issues.extend(self.check_content(content));

        Ok(issues)
    }

    fn check_frontmatter(&self, skill: &str, content: &str) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        let Some(frontmatter) = parse_frontmatter(content) else {
            issues.push(issue(
                Severity::Error,
                "frontmatter",
                "Missing or invalid YAML frontmatter (---...---)".to_string(),
                "Start the file with a YAML block holding name and description",
            ));
            return issues;
        };

        match frontmatter.name.as_deref() {
            None => issues.push(issue(
                Severity::Error,
                "frontmatter",
                "Missing required field: name".to_string(),
                "Add 'name: <skill-directory-name>' to frontmatter",
            )),
            Some(name) if name == skill => {}
            Some(name) if self.name_aliases.get(skill).map(String::as_str) == Some(name) => {
                issues.push(LintIssue {
                    severity: Severity::Info,
                    category: "frontmatter".to_string(),
                    message: format!("name '{}' is an accepted alias of '{}'", name, skill),
                    suggestion: None,
                });
            }
            Some(name) => issues.push(issue(
                Severity::Warning,
                "frontmatter",
                format!("name '{}' doesn't match directory name '{}'", name, skill),
                "Rename the directory or the name field so they agree",
            )),
        }

        match frontmatter.description.as_deref() {
            None => issues.push(issue(
                Severity::Error,
                "frontmatter",
                "Missing required field: description".to_string(),
                "Add a description with trigger phrases and an exclusion clause",
            )),
            Some(desc) if desc.trim().chars().count() < MIN_DESCRIPTION_CHARS => {
                issues.push(issue(
                    Severity::Warning,
                    "frontmatter",
                    format!(
                        "Description too short ({} chars)",
                        desc.trim().chars().count()
                    ),
                    "Describe what the skill does and when to use it",
                ));
                issues.extend(self.check_description(desc));
            }
            Some(desc) => issues.extend(self.check_description(desc)),
        }

        issues
    }

    /// Quality of the routing description
    fn check_description(&self, desc: &str) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        let phrases = extract_quoted_phrases(desc).len();
        if phrases == 0 {
            issues.push(issue(
                Severity::Error,
                "description",
                "No trigger phrases defined".to_string(),
                "Quote example requests, e.g. Use when user says \"build a RAG pipeline\"",
            ));
        } else if phrases < RECOMMENDED_TRIGGER_PHRASES {
            issues.push(issue(
                Severity::Warning,
                "description",
                format!(
                    "Only {} trigger phrase(s) (recommend {}+)",
                    phrases, RECOMMENDED_TRIGGER_PHRASES
                ),
                "Add more quoted example requests",
            ));
        }

        if !NEGATIVE_TRIGGER_RE.is_match(desc) {
            issues.push(issue(
                Severity::Warning,
                "description",
                "No negative triggers (risk of over-triggering)".to_string(),
                "Add a 'Do NOT use for ...' clause naming neighbouring skills' work",
            ));
        }

        let words = desc.split_whitespace().count();
        if words < MIN_DESCRIPTION_WORDS {
            issues.push(issue(
                Severity::Error,
                "description",
                format!("Description is {} words (too short)", words),
                "Aim for at least 30 words",
            ));
        } else if words < RECOMMENDED_DESCRIPTION_WORDS {
            issues.push(issue(
                Severity::Warning,
                "description",
                format!("Description is {} words (could be more specific)", words),
                "Aim for at least 30 words",
            ));
        }

        if !USAGE_CONTEXT_RE.is_match(desc) {
            issues.push(issue(
                Severity::Warning,
                "description",
                "Missing usage context".to_string(),
                "Say when to use the skill: 'Use when...' or 'when user says...'",
            ));
        }

        issues
    }

    fn check_structure(&self, content: &str) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        let has_steps = STEP_HEADING_RE.is_match(content) || WORKFLOW_HEADING_RE.is_match(content);
        let has_numbered_list = NUMBERED_BOLD_RE.is_match(content);
        if !has_steps && !has_numbered_list {
            issues.push(issue(
                Severity::Warning,
                "structure",
                "No clear numbered workflow found".to_string(),
                "Use '### Step 1' headings, a '## Workflow' section or a '1. **Step**' list",
            ));
        }

        issues
    }

    fn check_content(&self, content: &str) -> Vec<LintIssue> {
        let mut issues = Vec::new();

        if !CODE_FENCE_RE.is_match(content) {
            issues.push(issue(
                Severity::Warning,
                "content",
                "No code examples (skill may be too abstract)".to_string(),
                "Add at least one fenced code example",
            ));
        }

        if !CHECKBOX_RE.is_match(content) && !VERIFY_WORDS_RE.is_match(content) {
            issues.push(issue(
                Severity::Warning,
                "content",
                "No verification step or checklist".to_string(),
                "End the workflow with a '- [ ]' checklist or a verify step",
            ));
        }

        let lines = instruction_lines(content);
        if lines < MIN_INSTRUCTION_LINES {
            issues.push(issue(
                Severity::Error,
                "content",
                format!("Content depth: {} instruction lines (too shallow)", lines),
                "Write actionable steps instead of only routing to reference files",
            ));
        } else if lines < RECOMMENDED_INSTRUCTION_LINES {
            issues.push(issue(
                Severity::Warning,
                "content",
                format!("Content depth: {} instruction lines (thin)", lines),
                "Write actionable steps instead of only routing to reference files",
            ));
        }

        issues
    }

    /// Print issues in a human-readable format
    pub fn print_issues(&self, skill: &str, issues: &[LintIssue]) {
        if issues.is_empty() {
            println!("✅ {}: no issues", skill);
            return;
        }

        println!("\n📋 {}:", skill);

        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
            if group.is_empty() {
                continue;
            }
            let label = match severity {
                Severity::Error => "❌ Errors",
                Severity::Warning => "⚠️  Warnings",
                Severity::Info => "ℹ️  Info",
            };
            println!("{} ({}):", label, group.len());
            for issue in group {
                println!("   • [{}] {}", issue.category, issue.message);
                if let Some(suggestion) = &issue.suggestion {
                    println!("     💡 {}", suggestion);
                }
            }
        }
    }
}

/// Non-blank lines that are not headings or frontmatter, minus lines that
/// only route the reader to a reference file.
fn instruction_lines(content: &str) -> usize {
    let content_lines = content
        .lines()
        .map(str::trim)
        .filter(|l| {
            !l.is_empty()
                && !l.starts_with('#')
                && !l.starts_with("---")
                && !l.starts_with("name:")
                && !l.starts_with("description:")
        })
        .count();
    let routing_lines = REFERENCE_ROUTING_RE.find_iter(content).count();
    content_lines.saturating_sub(routing_lines)
}

//! Structural validation of a skill library on disk.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::LibraryConfig;
use crate::report::Report;
use crate::routing::extract::extract_quoted_phrases;
use crate::store::{DescriptorStore, SkillDocument};

static REFERENCE_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:references?)/([a-zA-Z0-9_-]+\.md)").unwrap());
static STUB_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(TODO|STUB|placeholder|expand after)\b").unwrap());
static ARTIFACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.claude/artifacts/|artifact").unwrap());

/// Runs every structural check over one loaded skill library
pub struct LibraryValidator<'a> {
    config: &'a LibraryConfig,
    store: &'a DescriptorStore,
}

impl<'a> LibraryValidator<'a> {
    pub fn new(config: &'a LibraryConfig, store: &'a DescriptorStore) -> Self {
        Self { config, store }
    }

    /// Run all checks, appending to `report`
    pub fn validate(&self, report: &mut Report) -> Result<()> {
        info!(
            "Validating {} skills in {}",
            self.store.documents().len(),
            self.config.skills_dir.display()
        );

        self.check_expected_present(report);
        self.check_unexpected(report);
        self.check_reference_files(report);
        self.check_reference_dir_naming(report);
        self.check_reference_stubs(report)?;
        self.check_trigger_overlaps(report);
        self.check_exclusions(report);
        self.check_catalog(report)?;
        self.check_artifact_paths(report);

        Ok(())
    }

    fn check_expected_present(&self, report: &mut Report) {
        const SECTION: &str = "skills present";
        let loaded = self.store.names();
        for skill in &self.config.expected_skills {
            let dir = self.config.skills_dir.join(skill);
            if loaded.contains(skill.as_str()) {
                report.pass(SECTION, format!("{}/SKILL.md exists", skill));
            } else if dir.is_dir() {
                report.fail(SECTION, format!("Missing SKILL.md: {}/SKILL.md", skill));
            } else {
                report.fail(SECTION, format!("Missing directory: {}/", skill));
            }
        }
    }

    fn check_unexpected(&self, report: &mut Report) {
        const SECTION: &str = "unexpected skills";
        if self.config.expected_skills.is_empty() {
            return;
        }
        let expected: HashSet<&str> = self
            .config
            .expected_skills
            .iter()
            .map(String::as_str)
            .collect();
        // Directories without a SKILL.md count too
        let unexpected: Vec<&str> = self
            .store
            .directory_names()
            .iter()
            .map(String::as_str)
            .filter(|name| !expected.contains(name))
            .collect();

        if unexpected.is_empty() {
            report.pass(SECTION, "No unexpected skill directories");
        }
        for name in unexpected {
            report.warn(SECTION, format!("Unexpected skill directory: {}/", name));
        }
    }

    fn check_reference_files(&self, report: &mut Report) {
        const SECTION: &str = "reference files";
        for doc in self.store.documents() {
            let mentions = self.reference_mentions(doc);
            if mentions.is_empty() {
                report.pass(SECTION, format!("{}: no reference file mentions", doc.name));
                continue;
            }
            for file in mentions {
                let plural = doc.dir.join("references").join(&file);
                let singular = doc.dir.join("reference").join(&file);
                if plural.is_file() || singular.is_file() {
                    report.pass(SECTION, format!("{}: references/{} exists", doc.name, file));
                } else {
                    report.fail(
                        SECTION,
                        format!("{}: references/{} NOT FOUND", doc.name, file),
                    );
                }
            }
        }
    }

    /// Distinct `references/<file>.md` mentions, minus configured prose examples
    fn reference_mentions(&self, doc: &SkillDocument) -> Vec<String> {
        let ignored: HashSet<&str> = self
            .config
            .reference_ignores
            .get(&doc.name)
            .map(|files| files.iter().map(String::as_str).collect())
            .unwrap_or_default();

        let mut seen = HashSet::new();
        REFERENCE_MENTION_RE
            .captures_iter(&doc.content)
            .map(|caps| caps[1].to_string())
            .filter(|file| !ignored.contains(file.as_str()))
            .filter(|file| seen.insert(file.clone()))
            .collect()
    }

    fn check_reference_dir_naming(&self, report: &mut Report) {
        const SECTION: &str = "reference directory naming";
        for doc in self.store.documents() {
            let plural = doc.dir.join("references").is_dir();
            let singular = doc.dir.join("reference").is_dir();
            match (plural, singular) {
                (true, true) => report.fail(
                    SECTION,
                    format!("{}: has BOTH reference/ AND references/", doc.name),
                ),
                (false, true) => report.warn(
                    SECTION,
                    format!("{}: uses 'reference/' instead of 'references/'", doc.name),
                ),
                (true, false) => report.pass(SECTION, format!("{}: uses 'references/'", doc.name)),
                (false, false) => {
                    report.pass(SECTION, format!("{}: no reference directory", doc.name))
                }
            }
        }
    }

    fn check_reference_stubs(&self, report: &mut Report) -> Result<()> {
        const SECTION: &str = "reference completeness";
        let mut complete = 0;
        let mut stubs = 0;

        for doc in self.store.documents() {
            let Some(refs_dir) = reference_dir(&doc.dir) else {
                continue;
            };
            let pattern = refs_dir.join("*.md");
            let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
                .context("Invalid reference glob pattern")?
                .filter_map(|entry| entry.ok())
                .collect();
            files.sort();

            for file in files {
                let content = fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let lines = content.lines().count();
                if STUB_MARKER_RE.is_match(&content) || lines < self.config.stub_min_lines {
                    let file_name = file.file_name().unwrap_or_default().to_string_lossy();
                    report.warn(
                        SECTION,
                        format!("{}/references/{}: stub ({} lines)", doc.name, file_name, lines),
                    );
                    stubs += 1;
                } else {
                    complete += 1;
                }
            }
        }

        debug!("Reference files: {} complete, {} stubs", complete, stubs);
        if stubs == 0 && complete > 0 {
            report.pass(SECTION, format!("{} reference files complete", complete));
        }
        Ok(())
    }

    fn check_trigger_overlaps(&self, report: &mut Report) {
        const SECTION: &str = "trigger overlaps";
        let mut owners: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for doc in self.store.documents() {
            let Some(description) = doc.description() else {
                continue;
            };
            for phrase in extract_quoted_phrases(description) {
                let skills = owners.entry(phrase).or_default();
                if !skills.contains(&doc.name.as_str()) {
                    skills.push(&doc.name);
                }
            }
        }

        let mut overlaps = false;
        for (phrase, skills) in &owners {
            if skills.len() > 1 {
                report.warn(
                    SECTION,
                    format!("Trigger '{}' shared by: {}", phrase, skills.join(", ")),
                );
                overlaps = true;
            }
        }
        if !overlaps {
            report.pass(SECTION, "No exact trigger phrase overlaps");
        }
    }

    fn check_exclusions(&self, report: &mut Report) {
        const SECTION: &str = "exclusion clauses";
        for skill in &self.config.exclusion_required {
            let Some(description) = self.store.document(skill).and_then(|d| d.description())
            else {
                continue;
            };
            let lower = description.to_lowercase();
            if lower.contains("do not use") || lower.contains("not for") || lower.contains("exclusion")
            {
                report.pass(SECTION, format!("{}: has exclusion clause", skill));
            } else {
                report.warn(
                    SECTION,
                    format!("{}: no exclusion clause (may be confused with related skills)", skill),
                );
            }
        }
    }

    fn check_catalog(&self, report: &mut Report) -> Result<()> {
        const SECTION: &str = "catalog";
        let Some(catalog) = &self.config.catalog else {
            return Ok(());
        };
        let path = self.config.skills_dir.join(catalog);
        if !path.is_file() {
            report.fail(SECTION, format!("{} not found", catalog));
            return Ok(());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .to_lowercase();
        for skill in &self.config.expected_skills {
            if content.contains(&skill.to_lowercase()) {
                report.pass(SECTION, format!("Catalog mentions {}", skill));
            } else {
                report.fail(SECTION, format!("Catalog missing {}", skill));
            }
        }
        Ok(())
    }

    fn check_artifact_paths(&self, report: &mut Report) {
        const SECTION: &str = "artifact paths";
        for skill in &self.config.artifact_skills {
            let Some(doc) = self.store.document(skill) else {
                continue;
            };
            if ARTIFACT_RE.is_match(&doc.content) {
                report.pass(SECTION, format!("{}: defines artifact output path", skill));
            } else {
                report.warn(SECTION, format!("{}: no artifact output path defined", skill));
            }
        }
    }
}

/// `references/` if present, else the singular `reference/`
fn reference_dir(skill_dir: &Path) -> Option<PathBuf> {
    ["references", "reference"]
        .iter()
        .map(|name| skill_dir.join(name))
        .find(|dir| dir.is_dir())
}

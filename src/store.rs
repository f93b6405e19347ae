//! Descriptor store: loads skill documents and hands the router plain
//! identifier + description pairs.
//!
//! A skill library is a directory with one sub-directory per skill, each
//! holding a `SKILL.md` whose YAML frontmatter carries `name` and
//! `description`. The directory name is the skill identifier.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::routing::SkillDescriptor;

pub const SKILL_FILE: &str = "SKILL.md";

static FRONTMATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\s*\n(.*?)\n---").unwrap());

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("skills directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate skill identifier: {0}")]
    DuplicateSkill(String),

    #[error("skill identifier is empty")]
    EmptyIdentifier,
}

/// The fields of a SKILL.md frontmatter block that the tooling reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Parse the leading `---` YAML block of a SKILL.md.
///
/// Returns `None` when the block is missing or is not valid YAML.
pub fn parse_frontmatter(content: &str) -> Option<Frontmatter> {
    let caps = FRONTMATTER_RE.captures(content)?;
    let yaml = &caps[1];
    if yaml.trim().is_empty() {
        return Some(Frontmatter::default());
    }
    match serde_yaml::from_str::<Frontmatter>(yaml) {
        Ok(fm) => Some(fm),
        Err(e) => {
            debug!("Invalid frontmatter YAML: {}", e);
            None
        }
    }
}

/// One skill directory as found on disk.
#[derive(Debug, Clone)]
pub struct SkillDocument {
    /// Directory name, used as the skill identifier
    pub name: String,
    pub dir: PathBuf,
    /// Full SKILL.md text, frontmatter included
    pub content: String,
    pub frontmatter: Option<Frontmatter>,
}

impl SkillDocument {
    pub fn description(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.description.as_deref()
    }
}

/// Immutable set of descriptors for one evaluation run.
#[derive(Debug, Clone, Default)]
pub struct DescriptorStore {
    documents: Vec<SkillDocument>,
    descriptors: Vec<SkillDescriptor>,
    /// Every non-hidden sub-directory seen while loading, with or without a SKILL.md
    directories: Vec<String>,
}

impl DescriptorStore {
    /// Load every `<dir>/<skill>/SKILL.md`, in directory-name order.
    ///
    /// Hidden directories and directories without a SKILL.md are skipped.
    /// Documents whose frontmatter is missing or invalid are kept for
    /// validation but contribute no descriptor.
    pub fn load_from_directory(dir: &Path) -> Result<Self, StoreError> {
        if !dir.is_dir() {
            return Err(StoreError::MissingDirectory(dir.to_path_buf()));
        }

        let mut skill_dirs: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err(dir))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        skill_dirs.sort();

        let mut store = Self::default();
        for skill_dir in skill_dirs {
            let Some(name) = skill_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            store.directories.push(name.to_string());
            let skill_md = skill_dir.join(SKILL_FILE);
            if !skill_md.is_file() {
                debug!("Skipping {}: no {}", name, SKILL_FILE);
                continue;
            }

            let content = fs::read_to_string(&skill_md).map_err(io_err(&skill_md))?;
            let frontmatter = parse_frontmatter(&content);
            if frontmatter.is_none() {
                warn!("{}: no valid frontmatter, skill will not be routed", name);
            }

            let document = SkillDocument {
                name: name.to_string(),
                dir: skill_dir.clone(),
                content,
                frontmatter,
            };
            if let Some(fm) = &document.frontmatter {
                let description = fm.description.as_deref().unwrap_or_default();
                store.push_descriptor(&document.name, description)?;
            }
            store.documents.push(document);
        }

        info!(
            "Loaded {} skills ({} routable) from {}",
            store.documents.len(),
            store.descriptors.len(),
            dir.display()
        );
        Ok(store)
    }

    /// Build a store from in-memory pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut store = Self::default();
        for (id, description) in pairs {
            store.push_descriptor(id.as_ref(), description.as_ref())?;
        }
        Ok(store)
    }

    fn push_descriptor(&mut self, id: &str, description: &str) -> Result<(), StoreError> {
        let id = normalize_identifier(id);
        if id.is_empty() {
            return Err(StoreError::EmptyIdentifier);
        }
        if self.descriptors.iter().any(|d| d.id() == id) {
            return Err(StoreError::DuplicateSkill(id));
        }
        self.descriptors
            .push(SkillDescriptor::new(id, normalize_description(description)));
        Ok(())
    }

    pub fn descriptors(&self) -> &[SkillDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, id: &str) -> Option<&SkillDescriptor> {
        self.descriptors.iter().find(|d| d.id() == id)
    }

    pub fn documents(&self) -> &[SkillDocument] {
        &self.documents
    }

    pub fn document(&self, name: &str) -> Option<&SkillDocument> {
        self.documents.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Names of every non-hidden sub-directory of the loaded skills directory,
    /// including ones that hold no SKILL.md.
    pub fn directory_names(&self) -> &[String] {
        &self.directories
    }

    /// Identifiers of every loaded document, routable or not.
    pub fn names(&self) -> HashSet<&str> {
        self.documents.iter().map(|d| d.name.as_str()).collect()
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn normalize_identifier(id: &str) -> String {
    id.trim().to_string()
}

/// Collapse runs of whitespace (including the line breaks of folded YAML
/// scalars) into single spaces.
fn normalize_description(description: &str) -> String {
    description.split_whitespace().collect::<Vec<_>>().join(" ")
}

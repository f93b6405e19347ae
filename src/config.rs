use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::routing::{AmbiguityClassifier, Router, DEFAULT_AMBIGUITY_GAP, DEFAULT_MIN_SCORE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Router threshold: results must score strictly above this (default: 0.05)
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Classifier gap: a rank 1 lead strictly below this is ambiguous (default: 0.15)
    #[serde(default = "default_ambiguity_gap")]
    pub ambiguity_gap: f64,

    /// How many top candidates the regression suite inspects (default: 3)
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            ambiguity_gap: default_ambiguity_gap(),
            top_n: default_top_n(),
        }
    }
}

impl RoutingConfig {
    pub fn router(&self) -> Router {
        Router::new(self.min_score)
    }

    pub fn classifier(&self) -> AmbiguityClassifier {
        AmbiguityClassifier::new(self.ambiguity_gap)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding one sub-directory per skill (default: ".claude/skills")
    #[serde(default = "default_skills_dir")]
    pub skills_dir: PathBuf,

    /// Catalog file, relative to skills_dir, that must list every expected skill.
    /// Unset disables the catalog check.
    #[serde(default)]
    pub catalog: Option<String>,

    /// Skills that must be present. Empty disables presence checks.
    #[serde(default)]
    pub expected_skills: Vec<String>,

    /// Reference files shorter than this are reported as stubs (default: 30)
    #[serde(default = "default_stub_min_lines")]
    pub stub_min_lines: usize,

    /// Skills that are easily confused with a neighbour and need an exclusion clause
    #[serde(default)]
    pub exclusion_required: Vec<String>,

    /// Skills that produce artifacts and must say where
    #[serde(default)]
    pub artifact_skills: Vec<String>,

    /// Accepted frontmatter names for skills whose name differs from their directory
    #[serde(default)]
    pub name_aliases: HashMap<String, String>,

    /// Per-skill reference mentions that are prose examples, not real files
    #[serde(default)]
    pub reference_ignores: HashMap<String, Vec<String>>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            skills_dir: default_skills_dir(),
            catalog: None,
            expected_skills: Vec::new(),
            stub_min_lines: default_stub_min_lines(),
            exclusion_required: Vec::new(),
            artifact_skills: Vec::new(),
            name_aliases: HashMap::new(),
            reference_ignores: HashMap::new(),
        }
    }
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

fn default_ambiguity_gap() -> f64 {
    DEFAULT_AMBIGUITY_GAP
}

fn default_top_n() -> usize {
    3
}

fn default_skills_dir() -> PathBuf {
    PathBuf::from(".claude/skills")
}

fn default_stub_min_lines() -> usize {
    30
}

impl Config {
    /// Load config from the working directory or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // An explicit path must exist and parse
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path));
        }

        if Path::new("skillroute.toml").exists() {
            debug!("Loading config from ./skillroute.toml");
            return Self::load_from_path("skillroute.toml");
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("skillroute").join("config.toml");
            if config_path.exists() {
                debug!("Loading config from {:?}", config_path);
                return Self::load_from_path(&config_path);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds that would make routing meaningless
    pub fn validate(&self) -> Result<()> {
        let routing = &self.routing;
        if !(0.0..=1.0).contains(&routing.min_score) {
            bail!(
                "routing.min_score must be within 0.0..=1.0, got {}",
                routing.min_score
            );
        }
        if !(0.0..=1.0).contains(&routing.ambiguity_gap) {
            bail!(
                "routing.ambiguity_gap must be within 0.0..=1.0, got {}",
                routing.ambiguity_gap
            );
        }
        if routing.top_n == 0 {
            bail!("routing.top_n must be at least 1");
        }
        Ok(())
    }

    /// Override the skills directory, e.g. from `--skills-dir`
    pub fn with_skills_dir(mut self, skills_dir: Option<String>) -> Self {
        if let Some(dir) = skills_dir {
            self.library.skills_dir = PathBuf::from(dir);
        }
        self
    }
}

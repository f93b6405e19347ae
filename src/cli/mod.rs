pub mod lint;
pub mod route;
pub mod suite;
pub mod validate;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::store::DescriptorStore;

/// Resolve config (with the `--skills-dir` override applied) and load the library
pub(crate) fn load_library(
    config_path: Option<String>,
    skills_dir: Option<String>,
) -> Result<(Config, DescriptorStore)> {
    let config = Config::load_with_path(config_path)?.with_skills_dir(skills_dir);
    debug!("Skills directory: {}", config.library.skills_dir.display());

    let store = DescriptorStore::load_from_directory(&config.library.skills_dir)
        .context("Failed to load skill library")?;
    Ok((config, store))
}

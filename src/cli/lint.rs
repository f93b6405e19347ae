use anyhow::{bail, Result};
use tracing::info;

use crate::lint::{Severity, SkillLinter};

use super::load_library;

/// Lint every SKILL.md in the library, or only `skill` when given.
pub fn run(
    config_path: Option<String>,
    skills_dir: Option<String>,
    skill: Option<String>,
) -> Result<()> {
    let (config, store) = load_library(config_path, skills_dir)?;
    let linter = SkillLinter::new().with_name_aliases(config.library.name_aliases.clone());

    let documents: Vec<_> = store
        .documents()
        .iter()
        .filter(|doc| skill.as_deref().is_none_or(|s| s == doc.name))
        .collect();
    if documents.is_empty() {
        match skill {
            Some(name) => bail!("Skill not found: {}", name),
            None => bail!(
                "No skills found in {}",
                config.library.skills_dir.display()
            ),
        }
    }

    info!("Linting {} skills", documents.len());

    let mut errors = 0;
    let mut warnings = 0;
    for doc in documents {
        let issues = linter.lint(&doc.name, &doc.content)?;
        linter.print_issues(&doc.name, &issues);
        errors += issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        warnings += issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count();
    }

    println!("\nSummary: {} errors, {} warnings", errors, warnings);
    if errors > 0 {
        bail!("{} lint error(s) found", errors);
    }

    Ok(())
}

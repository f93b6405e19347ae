use anyhow::{bail, Result};

use crate::report::{Report, Status};
use crate::validator::LibraryValidator;

use super::load_library;

/// Run the structural checks over the whole library.
pub fn run(config_path: Option<String>, skills_dir: Option<String>) -> Result<()> {
    let (config, store) = load_library(config_path, skills_dir)?;

    let mut report = Report::new();
    LibraryValidator::new(&config.library, &store).validate(&mut report)?;
    report.print();

    if report.has_failures() {
        bail!("{} structural check(s) failed", report.count(Status::Fail));
    }
    Ok(())
}

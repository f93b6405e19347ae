use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use crate::report::{Report, Status};
use crate::suite::{Suite, SuiteRunner};

use super::load_library;

/// Run a routing regression suite against the library.
pub fn run(suite_path: String, config_path: Option<String>, skills_dir: Option<String>) -> Result<()> {
    let suite = Suite::load(Path::new(&suite_path))?;
    let (config, store) = load_library(config_path, skills_dir)?;
    info!(
        "Suite {}: {} cases against {} skills",
        suite_path,
        suite.case_count(),
        store.len()
    );

    let runner = SuiteRunner::new(&store)
        .with_router(config.routing.router())
        .with_classifier(config.routing.classifier())
        .with_top_n(config.routing.top_n);

    let mut report = Report::new();
    runner.run(&suite, &mut report);
    report.print();

    if report.has_failures() {
        bail!("{} suite check(s) failed", report.count(Status::Fail));
    }
    Ok(())
}

//! Routing regression suites.
//!
//! A suite file lists prompts and the skill each should (or should not)
//! select. Running it against a skill library shows how description edits
//! move routing outcomes:
//!
//! ```toml
//! [[trigger]]
//! skill = "building-rag-pipeline"
//! should_trigger = ["Build a RAG pipeline with ChromaDB"]
//! should_not_trigger = ["Deploy my application to Kubernetes"]
//!
//! [[routing]]
//! prompt = "Help me with my AI agent"
//! note = "Generic, no single skill should dominate"
//!
//! [[functional]]
//! skill = "testing-ai-systems"
//! prompt = "Write tests for an agent that uses tool calling"
//! steps = ["mock", "TDD"]
//! references = ["llm-mocking.md"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::report::Report;
use crate::routing::{AmbiguityClassifier, RankedCandidates, Router, Verdict};
use crate::store::DescriptorStore;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Suite {
    #[serde(default, rename = "trigger")]
    pub triggers: Vec<TriggerCase>,
    #[serde(default)]
    pub routing: Vec<RoutingCase>,
    #[serde(default)]
    pub functional: Vec<FunctionalCase>,
}

/// Prompts that should and should not select one skill
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerCase {
    pub skill: String,
    #[serde(default)]
    pub should_trigger: Vec<String>,
    #[serde(default)]
    pub should_not_trigger: Vec<String>,
}

/// A prompt that sits between several skills.
///
/// Without `expected_top` the prompt must stay ambiguous.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingCase {
    pub prompt: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub expected_top: Option<String>,
}

/// Keywords a skill's workflow must mention to serve a prompt
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionalCase {
    pub skill: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub artifact: Option<String>,
    #[serde(default)]
    pub sections: Vec<String>,
}

impl Suite {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read suite file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid suite file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn case_count(&self) -> usize {
        self.triggers
            .iter()
            .map(|t| t.should_trigger.len() + t.should_not_trigger.len())
            .sum::<usize>()
            + self.routing.len()
            + self.functional.len()
    }
}

/// Evaluates suites against one descriptor store
pub struct SuiteRunner<'a> {
    store: &'a DescriptorStore,
    router: Router,
    classifier: AmbiguityClassifier,
    top_n: usize,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(store: &'a DescriptorStore) -> Self {
        Self {
            store,
            router: Router::default(),
            classifier: AmbiguityClassifier::default(),
            top_n: 3,
        }
    }

    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    pub fn with_classifier(mut self, classifier: AmbiguityClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    fn route(&self, prompt: &str) -> RankedCandidates {
        self.router.route(prompt, self.store.descriptors())
    }

    /// Run every case of `suite`, appending outcomes to `report`
    pub fn run(&self, suite: &Suite, report: &mut Report) {
        info!("Running {} suite cases", suite.case_count());
        for case in &suite.triggers {
            self.run_trigger_case(case, report);
        }
        for case in &suite.routing {
            self.run_routing_case(case, report);
        }
        for case in &suite.functional {
            self.run_functional_case(case, report);
        }
    }

    pub fn run_trigger_case(&self, case: &TriggerCase, report: &mut Report) {
        let section = format!("triggering: {}", case.skill);

        for prompt in &case.should_trigger {
            let ranked = self.route(prompt);
            let Some(top) = ranked.top() else {
                report.fail(&section, format!("SHOULD trigger: \"{}\" -> no match", prompt));
                continue;
            };
            if top.skill == case.skill {
                report.pass(
                    &section,
                    format!("SHOULD trigger: \"{}\" -> {}", prompt, top),
                );
            } else if let Some(rank) = ranked.rank_within(&case.skill, self.top_n) {
                report.warn(
                    &section,
                    format!(
                        "SHOULD trigger: \"{}\" -> #{} (top was {})",
                        prompt, rank, top.skill
                    ),
                );
            } else {
                report.fail(
                    &section,
                    format!("SHOULD trigger: \"{}\" -> MISSED (top: {})", prompt, top.skill),
                );
            }
        }

        for prompt in &case.should_not_trigger {
            let ranked = self.route(prompt);
            match ranked.top() {
                None => report.pass(
                    &section,
                    format!("Should NOT trigger: \"{}\" -> correct (no match)", prompt),
                ),
                Some(top) if top.skill == case.skill => report.fail(
                    &section,
                    format!(
                        "Should NOT trigger: \"{}\" -> WRONGLY matched ({:.2})",
                        prompt, top.score
                    ),
                ),
                Some(top) => report.pass(
                    &section,
                    format!(
                        "Should NOT trigger: \"{}\" -> correct (top: {})",
                        prompt, top.skill
                    ),
                ),
            }
        }
    }

    pub fn run_routing_case(&self, case: &RoutingCase, report: &mut Report) {
        const SECTION: &str = "cross-skill routing";
        let ranked = self.route(&case.prompt);
        debug!("\"{}\" -> {:?}", case.prompt, ranked);

        let Some(expected) = &case.expected_top else {
            match self.classifier.classify(&ranked) {
                Verdict::Ambiguous { gap, .. } => report.pass(
                    SECTION,
                    format!("\"{}\": correctly ambiguous (gap {:.2})", case.prompt, gap),
                ),
                Verdict::NoMatch => report.pass(
                    SECTION,
                    format!("\"{}\": no strong match (ambiguous)", case.prompt),
                ),
                Verdict::Resolved(winner) => report.warn(
                    SECTION,
                    format!("\"{}\": not ambiguous, {} dominates", case.prompt, winner),
                ),
            }
            return;
        };

        match ranked.top() {
            None => report.fail(
                SECTION,
                format!("\"{}\": expected {} but no match", case.prompt, expected),
            ),
            Some(top) if &top.skill == expected => report.pass(
                SECTION,
                format!("\"{}\": {} wins", case.prompt, top),
            ),
            Some(top) => match ranked.rank_within(expected, self.top_n) {
                Some(rank) => report.warn(
                    SECTION,
                    format!(
                        "\"{}\": expected {} but it's #{} (top: {})",
                        case.prompt, expected, rank, top.skill
                    ),
                ),
                None => report.fail(
                    SECTION,
                    format!(
                        "\"{}\": expected {} but got {}",
                        case.prompt, expected, top.skill
                    ),
                ),
            },
        }
    }

    pub fn run_functional_case(&self, case: &FunctionalCase, report: &mut Report) {
        let section = format!("functional: {}", case.skill);
        let Some(doc) = self.store.document(&case.skill) else {
            report.fail(&section, format!("{}: skill not found", case.skill));
            return;
        };
        let content = doc.content.to_lowercase();
        let mentions = |keyword: &str| content.contains(&keyword.to_lowercase());

        for step in &case.steps {
            if mentions(step) {
                report.pass(&section, format!("Workflow covers: {}", step));
            } else {
                report.fail(&section, format!("Workflow MISSING: {}", step));
            }
        }

        for reference in &case.references {
            if mentions(reference) {
                report.pass(&section, format!("References: {}", reference));
            } else {
                report.fail(&section, format!("Reference MISSING: {}", reference));
            }
        }

        if let Some(artifact) = case.artifact.as_deref().filter(|a| !a.is_empty()) {
            if mentions(artifact) {
                report.pass(&section, format!("Artifact path defined: {}*", artifact));
            } else {
                report.fail(&section, format!("Artifact path MISSING: {}*", artifact));
            }
        }

        for heading in &case.sections {
            if mentions(heading) {
                report.pass(&section, format!("Output section: {}", heading));
            } else {
                report.warn(&section, format!("Output section not found: {}", heading));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;

    fn store() -> DescriptorStore {
        DescriptorStore::from_pairs([
            (
                "building-rag-pipeline",
                r#"Build a RAG pipeline with retrieval and embeddings. Use when user says "build a RAG pipeline", "add vector search". Do NOT use for general agent building."#,
            ),
            (
                "deploying-ai-systems",
                r#"Deploys agents to Kubernetes clusters. Use when user says "deploy my agent"."#,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_suite() {
        let suite = Suite::parse(
            r#"
[[trigger]]
skill = "building-rag-pipeline"
should_trigger = ["Build a RAG pipeline with ChromaDB"]

[[routing]]
prompt = "Help me with my AI agent"

[[routing]]
prompt = "Add vector search to my agent"
expected_top = "building-rag-pipeline"

[[functional]]
skill = "building-rag-pipeline"
steps = ["chunk"]
"#,
        )
        .unwrap();
        assert_eq!(suite.triggers.len(), 1);
        assert!(suite.triggers[0].should_not_trigger.is_empty());
        assert_eq!(suite.routing.len(), 2);
        assert!(suite.routing[0].expected_top.is_none());
        assert_eq!(suite.case_count(), 4);
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(Suite::parse("[[trigger]]\nskill = ").is_err());
        // skill is required
        assert!(Suite::parse("[[trigger]]\nshould_trigger = []").is_err());
    }

    #[test]
    fn test_trigger_case_outcomes() {
        let store = store();
        let runner = SuiteRunner::new(&store);
        let mut report = Report::new();
        runner.run_trigger_case(
            &TriggerCase {
                skill: "building-rag-pipeline".into(),
                should_trigger: vec![
                    "Build a RAG pipeline with ChromaDB".into(),
                    "What's the weather today?".into(),
                ],
                should_not_trigger: vec![
                    "Deploy my agent to Kubernetes".into(),
                    "Build a RAG pipeline".into(),
                ],
            },
            &mut report,
        );
        let statuses: Vec<Status> = report.results().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![Status::Pass, Status::Fail, Status::Pass, Status::Fail]
        );
    }

    #[test]
    fn test_trigger_case_warns_when_runner_up() {
        let store = store();
        let runner = SuiteRunner::new(&store);
        let mut report = Report::new();
        runner.run_trigger_case(
            &TriggerCase {
                skill: "building-rag-pipeline".into(),
                should_trigger: vec!["deploy my agent with a pipeline".into()],
                should_not_trigger: vec![],
            },
            &mut report,
        );
        assert_eq!(report.results()[0].status, Status::Warn);
        assert!(report.results()[0].message.contains("#2"));

        // Outside the inspected window it is a miss
        let runner = SuiteRunner::new(&store).with_top_n(1);
        let mut report = Report::new();
        runner.run_trigger_case(
            &TriggerCase {
                skill: "building-rag-pipeline".into(),
                should_trigger: vec!["deploy my agent with a pipeline".into()],
                should_not_trigger: vec![],
            },
            &mut report,
        );
        assert_eq!(report.results()[0].status, Status::Fail);
    }

    #[test]
    fn test_routing_case_ambiguity() {
        let store = store();
        let runner = SuiteRunner::new(&store);
        let mut report = Report::new();
        runner.run_routing_case(
            &RoutingCase {
                prompt: "What's the weather today?".into(),
                note: String::new(),
                expected_top: None,
            },
            &mut report,
        );
        runner.run_routing_case(
            &RoutingCase {
                prompt: "Build a RAG pipeline with ChromaDB".into(),
                note: String::new(),
                expected_top: None,
            },
            &mut report,
        );
        let statuses: Vec<Status> = report.results().iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![Status::Pass, Status::Warn]);
    }

    #[test]
    fn test_routing_case_expected_top() {
        let store = store();
        let runner = SuiteRunner::new(&store);
        let mut report = Report::new();
        for (prompt, expected) in [
            ("Build a RAG pipeline with ChromaDB", "building-rag-pipeline"),
            ("Build a RAG pipeline with ChromaDB", "deploying-ai-systems"),
            ("What's the weather today?", "deploying-ai-systems"),
        ] {
            runner.run_routing_case(
                &RoutingCase {
                    prompt: prompt.into(),
                    note: String::new(),
                    expected_top: Some(expected.into()),
                },
                &mut report,
            );
        }
        let statuses: Vec<Status> = report.results().iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![Status::Pass, Status::Fail, Status::Fail]);
    }

    #[test]
    fn test_functional_case_missing_skill() {
        let store = store();
        let mut report = Report::new();
        SuiteRunner::new(&store).run_functional_case(
            &FunctionalCase {
                skill: "nope".into(),
                prompt: String::new(),
                steps: vec![],
                references: vec![],
                artifact: None,
                sections: vec![],
            },
            &mut report,
        );
        assert!(report.has_failures());
    }
}

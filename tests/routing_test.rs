//! Integration tests for prompt routing
//! Tests the scorer, router and ambiguity classifier together:
//! - Score bounds and determinism
//! - Threshold filtering and stable ordering
//! - Exclusion clauses outweighing topic overlap
//! - Ambiguity gap decisions

use anyhow::Result;
use skillroute::routing::{
    classify, explain, route, score, AmbiguityClassifier, RankedCandidates, Router, ScoreResult,
    SkillDescriptor, Verdict,
};

const RAG: &str = r#"Build RAG pipelines with retrieval and embeddings. Use when user says "build a RAG pipeline", "add vector search". Do NOT use for general agent building."#;
const DEPLOY: &str =
    r#"Deploys agents to Kubernetes clusters. Use when user says "deploy my agent", "ship to production"."#;
const TESTING: &str = "Writes agent tests with mocks. Do not use for unit testing or mocking.";

fn library() -> Vec<SkillDescriptor> {
    vec![
        SkillDescriptor::new("deploying-ai-systems", DEPLOY),
        SkillDescriptor::new("building-rag-pipeline", RAG),
        SkillDescriptor::new("testing-ai-systems", TESTING),
    ]
}

fn ranked(scores: &[(&str, f64)]) -> RankedCandidates {
    RankedCandidates::from_ranked(
        scores
            .iter()
            .map(|(skill, score)| ScoreResult::new(*skill, *score))
            .collect(),
    )
}

#[test]
fn test_rag_prompt_ranks_rag_skill_first() -> Result<()> {
    let prompt = "Build a RAG pipeline with ChromaDB";
    assert!(score(prompt, RAG) > 0.5);

    let ranked = route(prompt, &library());
    let top = ranked.top().expect("rag skill should match");
    assert_eq!(top.skill, "building-rag-pipeline");
    assert!(classify(&ranked).winner().is_some());

    Ok(())
}

#[test]
fn test_unrelated_prompt_matches_nothing() -> Result<()> {
    let prompt = "What's the weather today?";
    for descriptor in library() {
        assert_eq!(score(prompt, descriptor.description()), 0.0);
    }

    let ranked = route(prompt, &library());
    assert!(ranked.is_empty());
    assert_eq!(classify(&ranked), Verdict::NoMatch);

    Ok(())
}

#[test]
fn test_close_scores_are_ambiguous() -> Result<()> {
    let verdict = classify(&ranked(&[("a", 0.40), ("b", 0.38)]));
    match verdict {
        Verdict::Ambiguous {
            top,
            runner_up,
            gap,
        } => {
            assert_eq!(top.skill, "a");
            assert_eq!(runner_up.skill, "b");
            assert!((gap - 0.02).abs() < 1e-9);
        }
        other => panic!("expected ambiguous, got {}", other),
    }

    Ok(())
}

#[test]
fn test_clear_lead_resolves() -> Result<()> {
    let verdict = classify(&ranked(&[("a", 0.70), ("b", 0.40)]));
    assert_eq!(verdict, Verdict::Resolved(ScoreResult::new("a", 0.70)));

    Ok(())
}

#[test]
fn test_exclusion_clause_pulls_score_down() -> Result<()> {
    let prompt = "Write unit tests for my agent";
    let breakdown = explain(prompt, TESTING);

    // "tests" does not match "testing", so only "unit" overlaps
    assert_eq!(breakdown.excluded_terms, vec!["unit".to_string()]);
    assert_eq!(breakdown.exclusion_penalty(), 1.0);

    let without_exclusion = score(prompt, "Writes agent tests with mocks.");
    let with_exclusion = score(prompt, TESTING);
    assert!(with_exclusion < without_exclusion);
    assert!((with_exclusion - 1.0 / 6.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_exclusion_can_outweigh_topic_overlap() -> Result<()> {
    let description =
        "Writes agent tests. Do not use for unit testing, mocking, fixtures, snapshots or coverage.";
    let prompt = "unit testing mocking fixtures snapshots coverage for agent tests";

    let breakdown = explain(prompt, description);
    assert!(breakdown.topic_signal() > 0.0);
    assert!(breakdown.raw < 0.0);
    assert_eq!(score(prompt, description), 0.0);

    Ok(())
}

#[test]
fn test_score_is_deterministic_and_bounded() -> Result<()> {
    let prompts = [
        "",
        "Build a RAG pipeline",
        "deploy my agent to production with kubernetes clusters",
        "Write unit tests for my agent",
        "\"quoted\" prompt. with periods.",
    ];
    for prompt in prompts {
        for descriptor in library() {
            let first = score(prompt, descriptor.description());
            let second = score(prompt, descriptor.description());
            assert_eq!(first, second);
            assert!((0.0..=1.0).contains(&first), "{} out of range", first);
        }
    }
    assert_eq!(score("anything", ""), 0.0);

    Ok(())
}

#[test]
fn test_route_respects_threshold_and_order() -> Result<()> {
    let prompt = "deploy my agent with a RAG pipeline";
    let descriptors = library();
    let ranked = route(prompt, &descriptors);

    assert!(ranked.iter().all(|r| r.score > 0.05));
    let scores: Vec<f64> = ranked.iter().map(|r| r.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // Every descriptor above the threshold is present, nothing else
    let above = descriptors
        .iter()
        .filter(|d| score(prompt, d.description()) > 0.05)
        .count();
    assert_eq!(ranked.len(), above);

    // A strict router keeps fewer candidates
    let strict = Router::new(0.9).route(prompt, &descriptors);
    assert!(strict.len() <= ranked.len());

    Ok(())
}

#[test]
fn test_equal_scores_keep_input_order() -> Result<()> {
    let description = r#"Deploys agents. Use when "deploy my agent"."#;
    let forward = vec![
        SkillDescriptor::new("first", description),
        SkillDescriptor::new("second", description),
    ];
    let backward: Vec<SkillDescriptor> = forward.iter().rev().cloned().collect();

    let names = |ranked: RankedCandidates| -> Vec<String> {
        ranked.into_vec().into_iter().map(|r| r.skill).collect()
    };
    assert_eq!(names(route("deploy my agent", &forward)), vec!["first", "second"]);
    assert_eq!(names(route("deploy my agent", &backward)), vec!["second", "first"]);

    // Identical scores are always ambiguous
    assert!(classify(&route("deploy my agent", &forward)).is_ambiguous());

    Ok(())
}

#[test]
fn test_gap_boundary_resolves() -> Result<()> {
    let classifier = AmbiguityClassifier::new(0.25);
    let at_gap = ranked(&[("a", 0.75), ("b", 0.5)]);
    assert!(classifier.classify(&at_gap).winner().is_some());

    let below_gap = ranked(&[("a", 0.75), ("b", 0.625)]);
    assert!(classifier.classify(&below_gap).is_ambiguous());

    // A lone candidate resolves however low it scores
    let single = ranked(&[("a", 0.06)]);
    assert_eq!(classify(&single).winner().map(|w| w.skill.as_str()), Some("a"));

    Ok(())
}

#[test]
fn test_verdict_serializes_with_tag() -> Result<()> {
    let json = serde_json::to_value(classify(&ranked(&[("a", 0.70), ("b", 0.40)])))?;
    assert_eq!(json["verdict"], "resolved");

    let json = serde_json::to_value(classify(&RankedCandidates::default()))?;
    assert_eq!(json["verdict"], "no_match");

    Ok(())
}

use anyhow::{bail, Result};
use serde_json::json;
use tracing::info;

use crate::routing::{self, RankedCandidates, Verdict};

use super::load_library;

/// Route one prompt and print the ranked candidates and the verdict.
pub fn run(
    prompt: String,
    config_path: Option<String>,
    skills_dir: Option<String>,
    top: usize,
    as_json: bool,
) -> Result<()> {
    let (config, store) = load_library(config_path, skills_dir)?;
    info!("Routing against {} skills", store.len());

    let ranked = config.routing.router().route(&prompt, store.descriptors());
    let verdict = config.routing.classifier().classify(&ranked);

    if as_json {
        let shown: Vec<_> = ranked.iter().take(top).collect();
        let output = json!({
            "prompt": prompt,
            "candidates": shown,
            "verdict": verdict,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_ranking(&prompt, &ranked, top);
        println!("\n{}", describe_verdict(&verdict));
    }

    Ok(())
}

/// Print every intermediate signal for one skill.
pub fn explain(
    prompt: String,
    skill: String,
    config_path: Option<String>,
    skills_dir: Option<String>,
    as_json: bool,
) -> Result<()> {
    let (_, store) = load_library(config_path, skills_dir)?;
    let Some(descriptor) = store.descriptor(&skill) else {
        bail!("Unknown skill: {}", skill);
    };

    let breakdown = routing::explain(&prompt, descriptor.description());

    if as_json {
        let output = json!({
            "prompt": prompt,
            "skill": skill,
            "confidence": breakdown.confidence(),
            "breakdown": breakdown,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} for \"{}\"", skill, prompt);
    if breakdown.trigger_phrases.is_empty() {
        println!("  trigger phrases: none (signal inactive)");
    } else {
        println!(
            "  trigger phrases: {}/{} matched {:?}  -> +{:.2}",
            breakdown.matched_phrases.len(),
            breakdown.trigger_phrases.len(),
            breakdown.matched_phrases,
            breakdown.trigger_signal()
        );
    }
    println!(
        "  exclusion:       {:?}  -> -{:.2}",
        breakdown.excluded_terms,
        breakdown.exclusion_penalty()
    );
    println!(
        "  topic overlap:   {:?}  -> +{:.2}",
        breakdown.topic_terms,
        breakdown.topic_signal()
    );
    println!(
        "  confidence:      {:.2} / {:.2} => {:.2}",
        breakdown.raw,
        breakdown.max_possible,
        breakdown.confidence()
    );

    Ok(())
}

fn print_ranking(prompt: &str, ranked: &RankedCandidates, top: usize) {
    println!("\"{}\"", prompt);
    if ranked.is_empty() {
        println!("  (no skill scored above the threshold)");
        return;
    }
    for (i, result) in ranked.iter().take(top).enumerate() {
        println!("  {}. {:<40} {:.2}", i + 1, result.skill, result.score);
    }
    if ranked.len() > top {
        println!("  ... {} more", ranked.len() - top);
    }
}

fn describe_verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::NoMatch => "⚪ No confident match".to_string(),
        Verdict::Ambiguous {
            top,
            runner_up,
            gap,
        } => format!(
            "🟡 Ambiguous: {} and {} are {:.2} apart; ask a clarifying question",
            top.skill, runner_up.skill, gap
        ),
        Verdict::Resolved(winner) => format!("🟢 Resolved: {}", winner),
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skillroute::cli;

#[derive(Parser)]
#[command(name = "skillroute", version)]
#[command(about = "Route prompts to the right skill and keep skill descriptions sharp", long_about = None)]
struct Cli {
    /// Path to config file (defaults to ./skillroute.toml or ~/.config/skillroute/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Skill library directory (overrides config)
    #[arg(long, global = true)]
    skills_dir: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank skills for a prompt and classify the outcome
    Route {
        /// The user prompt
        prompt: String,

        /// Number of candidates to show
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show how a prompt scores against one skill
    Explain {
        /// The user prompt
        prompt: String,

        /// Skill identifier
        #[arg(short, long)]
        skill: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Lint SKILL.md descriptions and structure
    Lint {
        /// Lint only this skill
        #[arg(short, long)]
        skill: Option<String>,
    },
    /// Run structural checks over the whole library
    Validate,
    /// Run a routing regression suite
    Test {
        /// Suite file (TOML)
        suite: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Route { prompt, top, json } => {
            cli::route::run(prompt, cli.config, cli.skills_dir, top, json)?;
        }
        Commands::Explain {
            prompt,
            skill,
            json,
        } => {
            cli::route::explain(prompt, skill, cli.config, cli.skills_dir, json)?;
        }
        Commands::Lint { skill } => {
            cli::lint::run(cli.config, cli.skills_dir, skill)?;
        }
        Commands::Validate => {
            cli::validate::run(cli.config, cli.skills_dir)?;
        }
        Commands::Test { suite } => {
            cli::suite::run(suite, cli.config, cli.skills_dir)?;
        }
    }

    Ok(())
}

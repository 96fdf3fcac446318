//! Command line driver for the pairwise ratings library
//!
//! Reads ratings lists and competition tables as JSON, runs the configured
//! rule over them and writes the result as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pairwise_ratings::config::{validate_config, AppConfig};
use pairwise_ratings::rules::UpdateRule;
use pairwise_ratings::scoring::{score_direction, score_ratings, ScoringRule};
use pairwise_ratings::simulation::simulate_season;
use pairwise_ratings::{Competition, RatingsList, RatingsTable};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Pairwise Ratings - rate players from head-to-head competition tables
#[derive(Parser)]
#[command(
    name = "ratings",
    version,
    about = "Rate players from pairwise competition results",
    long_about = "Applies Elo-family, least squares and Keener rating rules to competition \
                 tables, scores their predictions and simulates synthetic seasons."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Rule override
    #[arg(
        short,
        long,
        value_name = "NAME",
        help = "Use rule NAME with the configured parameters and wrapped rule"
    )]
    rule: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Update a ratings list from a competition table
    Update {
        #[arg(long, value_name = "FILE")]
        ratings: PathBuf,
        #[arg(long, value_name = "FILE")]
        competitions: PathBuf,
        /// Record each batch into a table with this many slots
        #[arg(long, value_name = "SLOTS")]
        record: Option<usize>,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Describe the configured rule
    Info,
    /// Score the configured rule's predictions against an outcome table
    Score {
        #[arg(long, value_name = "FILE")]
        ratings: PathBuf,
        #[arg(long, value_name = "FILE")]
        competitions: PathBuf,
        #[arg(long, value_enum, default_value = "brier")]
        scoring: ScoringRule,
    },
    /// Simulate a season from a ratings list
    Simulate {
        #[arg(long, value_name = "FILE")]
        ratings: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Validate configuration and exit
    Check,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(rule) = &args.rule {
        config.rule.rename(rule);
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn run_update(
    rule: &UpdateRule,
    ratings: &Path,
    competitions: &Path,
    record: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let ratings: RatingsList = read_json(ratings)?;
    let competitions: Vec<Competition> = read_json(competitions)?;
    info!(
        rule = rule.name(),
        players = ratings.len(),
        rows = competitions.len(),
        "Updating ratings"
    );

    match record {
        Some(slots) => {
            let mut table = RatingsTable::with_capacity(slots);
            let update = rule.update_ratings_recorded(&ratings, &competitions, &mut table)?;
            if !update.overflows.is_empty() {
                warn!(dropped = update.overflows.len(), "Some snapshots were not recorded");
            }
            write_json(&serde_json::json!({ "update": update, "table": table }), output)
        }
        None => write_json(&rule.update_ratings(&ratings, &competitions)?, output),
    }
}

fn run_score(
    rule: &UpdateRule,
    ratings: &Path,
    competitions: &Path,
    scoring: ScoringRule,
) -> Result<()> {
    let ratings: RatingsList = read_json(ratings)?;
    let outcomes: Vec<Competition> = read_json(competitions)?;
    let score = score_ratings(scoring, &outcomes, rule, &ratings)?;

    write_json(
        &serde_json::json!({
            "rule": rule.name(),
            "scoring": scoring.name(),
            "score": score,
            "direction": score_direction(scoring),
        }),
        None,
    )
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let rule = config.rule.build(&config.rating).unwrap_or_else(|e| {
        error!("Failed to build rule: {:#}", e);
        std::process::exit(1);
    });
    info!("{} {} using rule {}", config.service.name, pairwise_ratings::VERSION, rule.name());

    match &args.command {
        Command::Update {
            ratings,
            competitions,
            record,
            output,
        } => run_update(&rule, ratings, competitions, *record, output.as_deref()),
        Command::Info => write_json(&rule.update_info(), None),
        Command::Score {
            ratings,
            competitions,
            scoring,
        } => run_score(&rule, ratings, competitions, *scoring),
        Command::Simulate { ratings, seed, output } => {
            let ratings: RatingsList = read_json(ratings)?;
            let mut simulation = config.simulation.clone();
            if let Some(seed) = seed {
                simulation.seed = *seed;
            }
            let competitions = simulate_season(&simulation, &ratings)?;
            info!(games = competitions.len(), "Simulated season");
            write_json(&competitions, output.as_deref())
        }
        Command::Check => {
            info!("Configuration validation successful");
            write_json(&config, None)
        }
    }
}

//! Command-line entry point for the foosball rating engine
//!
//! Replays a file of match results through every configured rating system
//! and prints standings, the match log or a player's trajectory as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use foosball_ratings::config::AppConfig;
use foosball_ratings::metrics::MetricsCollector;
use foosball_ratings::{MatchSubmission, RatingError, RatingRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Foosball Ratings - side-by-side skill ratings for two-player matches
#[derive(Parser)]
#[command(
    name = "foosball-ratings",
    version,
    about = "Replay foosball match results through several rating systems",
    long_about = "Foosball Ratings keeps an append-only log of two-player match results and \
                 rates players under Net Promoter Score, Wins Minus Losses, Rating Percentage \
                 Index and Elo simultaneously."
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

    /// Match results to replay
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON array of {player1, score1, player2, score2} objects, replayed in order"
    )]
    games: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Print the match log
    #[arg(long, help = "Print the full match history instead of standings")]
    history: bool,

    /// Print one player's trajectory
    #[arg(
        short,
        long,
        value_name = "NAME",
        help = "Print a player's rating history under every system"
    )]
    player: Option<String>,

    /// Print metrics after replaying
    #[arg(long, help = "Print Prometheus metrics after replaying matches")]
    metrics: bool,

    /// Skip invalid matches instead of aborting
    #[arg(long, help = "Skip invalid match entries instead of stopping at the first one")]
    skip_invalid: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without replaying matches")]
    dry_run: bool,
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

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    Ok(config)
}

fn load_games(path: &Path) -> Result<Vec<MatchSubmission>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read games file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse games file {}", path.display()))
}

/// Feed every submission to the registry, stopping at the first fatal error
fn replay(
    registry: &mut RatingRegistry,
    games: Vec<MatchSubmission>,
    skip_invalid: bool,
) -> Result<()> {
    for (index, submission) in games.into_iter().enumerate() {
        if let Err(e) = registry.submit(submission) {
            let recoverable = e
                .downcast_ref::<RatingError>()
                .is_some_and(RatingError::is_recoverable);
            if recoverable && skip_invalid {
                warn!("Skipping game #{}: {}", index + 1, e);
                continue;
            }
            return Err(e.context(format!("Game #{} could not be recorded", index + 1)));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "{} v{} starting",
        config.service.name,
        foosball_ratings::VERSION
    );

    if args.dry_run {
        info!("Configuration validation successful");
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let metrics = Arc::new(MetricsCollector::new()?);
    let mut registry = RatingRegistry::from_config(&config.ratings)?.with_metrics(metrics.clone());

    if let Some(path) = &args.games {
        let games = load_games(path)?;
        info!("Replaying {} games from {}", games.len(), path.display());
        if let Err(e) = replay(&mut registry, games, args.skip_invalid) {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }

    let output = if args.history {
        serde_json::to_string_pretty(registry.full_history())?
    } else if let Some(player) = &args.player {
        serde_json::to_string_pretty(&registry.player_trajectory(player))?
    } else {
        serde_json::to_string_pretty(&registry.current_standings())?
    };
    println!("{}", output);

    if args.metrics {
        print!("{}", metrics.gather_text()?);
    }

    info!("Recorded {} matches", registry.match_count());
    Ok(())
}

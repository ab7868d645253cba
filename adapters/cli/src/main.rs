#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a maze chase session headlessly.

mod session_file;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chase_core::{Outcome, SessionConfig};
use chase_system_referee::Session;
use clap::Parser;

/// Command-line arguments accepted by the `chase` binary.
#[derive(Debug, Parser)]
#[command(name = "chase", about = "Runs a maze chase session until it is decided")]
struct CliArgs {
    /// TOML session file. The classic maze is used when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 2_000)]
    ticks: u64,
    /// Overrides the seed from the session file.
    #[arg(long)]
    seed: Option<u64>,
    /// Drives the player with the scripted auto-mode.
    #[arg(long)]
    auto: bool,
    /// Comma separated `L`, `R`, `M` tokens replayed in auto-mode.
    #[arg(long, value_name = "TOKENS")]
    moves: Option<String>,
    /// Prints one JSON snapshot per tick to stdout.
    #[arg(long)]
    trace: bool,
}

/// Entry point for the chase command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = resolve_config(&args)?;
    tracing::info!(
        seed = config.seed,
        adversaries = config.adversaries.len(),
        auto = config.player.auto,
        overrides = !config.items.is_empty(),
        "starting session"
    );

    let mut session = Session::new(&config).context("failed to set up session")?;
    if args.trace {
        println!("{}", serde_json::to_string(&session.snapshot())?);
    }

    let mut snapshot = session.snapshot();
    while !snapshot.outcome.is_decided() && snapshot.tick < args.ticks {
        snapshot = session.on_tick();
        if args.trace {
            println!("{}", serde_json::to_string(&snapshot)?);
        }
    }

    println!(
        "outcome={} tick={} score={} remaining={}",
        outcome_label(snapshot.outcome),
        snapshot.tick,
        snapshot.score,
        snapshot.remaining_score_items
    );
    Ok(())
}

fn resolve_config(args: &CliArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => session_file::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.auto {
        config.player.auto = true;
    }
    if let Some(moves) = &args.moves {
        config.player.moves.clone_from(moves);
    }
    Ok(config)
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Running => "running",
        Outcome::Won => "won",
        Outcome::Lost => "lost",
    }
}

//! Demo battle runner.
//!
//! Loads a catalog, a configuration and two starter parties, then lets the
//! built-in planner fight the battle out while narration goes to stdout.
//! Run with: `cargo run -p battle-cli -- --max-turns 30`

mod app;
mod narrator;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use app::DemoBattle;

/// Run an automatic battle between two parties
#[derive(Parser)]
#[command(name = "battle-cli")]
#[command(about = "Turn-based battle demo", long_about = None)]
#[command(version)]
struct Cli {
    /// Battle configuration (TOML); defaults to the bundled config
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skill, status and unit catalog (RON); defaults to the bundled catalog
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Starter parties (RON); the first two are used
    #[arg(short, long, value_name = "FILE")]
    parties: Option<PathBuf>,

    /// Stop after this many turns even if nobody has won
    #[arg(short, long, default_value = "50")]
    max_turns: u32,

    /// Hide phase headers
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let demo = DemoBattle::load(
        cli.config.as_deref(),
        cli.catalog.as_deref(),
        cli.parties.as_deref(),
    )?;
    demo.run(cli.max_turns, cli.quiet)
}

/// Logs go to stderr so they never interleave with narration on stdout.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

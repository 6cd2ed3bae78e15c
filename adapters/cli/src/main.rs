#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Hunt the Wumpus on the terminal.

mod config;
mod console;
mod game;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use wumpus_core::Difficulty;
use wumpus_system_scoring::ScoreLedger;

use crate::{config::GameConfig, console::Console, game::Game};

/// Command-line options. Every flag overrides the matching config file value.
#[derive(Debug, Parser)]
#[command(name = "wumpus", about = "Hunt the Wumpus through a twenty-room cave", version)]
pub(crate) struct Cli {
    /// Configuration file path. A missing file means defaults.
    #[arg(short, long, default_value = "wumpus.toml")]
    pub(crate) config: PathBuf,

    /// Difficulty from 1 (gentle) to 5 (brutal).
    #[arg(short, long, value_parser = parse_difficulty)]
    pub(crate) difficulty: Option<Difficulty>,

    /// Arrows in the quiver at the start of every hunt (at least 1).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
    pub(crate) arrows: Option<u8>,

    /// Hand out five arrows, or three from difficulty 3 upwards.
    #[arg(long)]
    pub(crate) scaled_arrows: bool,

    /// Seed for reproducible caves.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// High-score file path.
    #[arg(long = "scores")]
    pub(crate) score_file: Option<PathBuf>,

    /// Verbose logging on stderr (-v, -vv, -vvv for more).
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    let level: u8 = value
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    Difficulty::new(level).map_err(|error| error.to_string())
}

/// Entry point for the Hunt the Wumpus command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = GameConfig::load(&cli.config)?.with_overrides(&cli);
    let ledger = ScoreLedger::load(&config.score_file).with_context(|| {
        format!(
            "failed to load high scores from {}",
            config.score_file.display()
        )
    })?;
    info!(
        "starting at difficulty {} with {} recorded scores",
        config.difficulty,
        ledger.len()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());
    let mut game = Game::new(config.settings(), ledger, config.score_file, console);
    game.run().context("terminal I/O failed")
}

/// Logs go to stderr so they never interleave with the game on stdout.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Stderr)
        .init();
}

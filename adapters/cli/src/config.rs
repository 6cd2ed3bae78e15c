//! Optional TOML configuration merged with command-line overrides.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use log::info;
use serde::Deserialize;
use wumpus_core::Difficulty;
use wumpus_session::{ArrowAllowance, Settings};

use crate::Cli;

/// Game configuration read from `wumpus.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Difficulty new hunts start with.
    pub(crate) difficulty: Difficulty,
    /// Arrows per hunt when the allowance is fixed.
    pub(crate) arrows: u8,
    /// Scale the allowance with difficulty instead.
    pub(crate) scaled_arrows: bool,
    /// Seed for reproducible caves.
    pub(crate) seed: Option<u64>,
    /// Where the high-score table lives.
    pub(crate) score_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            arrows: 2,
            scaled_arrows: false,
            seed: None,
            score_file: PathBuf::from("highscore.txt"),
        }
    }
}

impl GameConfig {
    /// Reads the configuration at `path`, falling back to defaults when the file is absent.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)
                .with_context(|| format!("invalid configuration in {}", path.display())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!("no configuration at {}; using defaults", path.display());
                Ok(Self::default())
            }
            Err(error) => {
                Err(error).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    /// Parses a configuration, rejecting an empty quiver.
    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        ensure!(config.arrows > 0, "arrows must be at least 1");
        Ok(config)
    }

    /// Replaces file values with any flag given on the command line.
    pub(crate) fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(difficulty) = cli.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(arrows) = cli.arrows {
            self.arrows = arrows;
        }
        self.scaled_arrows |= cli.scaled_arrows;
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if let Some(path) = &cli.score_file {
            self.score_file = path.clone();
        }
        self
    }

    /// Session settings described by the configuration.
    pub(crate) fn settings(&self) -> Settings {
        let arrows = if self.scaled_arrows {
            ArrowAllowance::ScaledByDifficulty
        } else {
            ArrowAllowance::Fixed(self.arrows)
        };
        Settings {
            difficulty: self.difficulty,
            arrows,
            seed: self.seed,
        }
    }
}

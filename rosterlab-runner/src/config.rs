//! Runner configuration — data locations, per-game ladders, audit log.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) yields a working setup with the built-in ladders:
//!
//! ```toml
//! data_dir = "data"
//!
//! [games.osrs.ladder]
//! kind = "threshold"
//! ranks = ["thief", "recruit", "corporal"]
//! rungs = [{ from = "thief", to = "recruit", min_tenure_days = 14, min_experience = 50000 }]
//!
//! [audit]
//! path = "audit/promotions.jsonl"
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rosterlab_core::{
    BandedLadder, LadderError, PromotionRung, RankLadder, RankOrder, TenureBand, ThresholdLadder,
};

/// Errors from loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown game '{0}' (expected osrs or rs3)")]
    UnknownGame(String),
    #[error("invalid {game} ladder: {source}")]
    Ladder {
        game: Game,
        #[source]
        source: LadderError,
    },
}

// ─── Game ────────────────────────────────────────────────────────────

/// The two game variants a clan roster can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// Old School RuneScape — threshold ladder.
    Osrs,
    /// RuneScape 3 — banded ladder.
    Rs3,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::Osrs, Game::Rs3];

    pub fn as_str(self) -> &'static str {
        match self {
            Game::Osrs => "osrs",
            Game::Rs3 => "rs3",
        }
    }

    fn default_roster(self) -> &'static str {
        match self {
            Game::Osrs => "members/oldschoolrunescape/osrs_memberlist.json",
            Game::Rs3 => "members/runescape3/rs3_memberlist.json",
        }
    }

    fn default_inactivity(self) -> &'static str {
        match self {
            Game::Osrs => "activity/osrs-inactivity-list.json",
            Game::Rs3 => "activity/rs3-inactivity-list.json",
        }
    }

    /// Built-in ladder for this game.
    pub fn builtin_ladder(self) -> Box<dyn RankLadder> {
        match self {
            Game::Osrs => Box::new(ThresholdLadder::osrs()),
            Game::Rs3 => Box::new(BandedLadder::rs3()),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osrs" => Ok(Game::Osrs),
            "rs3" => Ok(Game::Rs3),
            _ => Err(ConfigError::UnknownGame(s.to_string())),
        }
    }
}

// ─── Ladder definitions ──────────────────────────────────────────────

/// A ladder spelled out in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LadderConfig {
    Threshold {
        /// Lowest rank first.
        ranks: Vec<String>,
        #[serde(default)]
        ignored: Vec<String>,
        #[serde(default)]
        rungs: Vec<PromotionRung>,
    },
    Banded {
        ranks: Vec<String>,
        #[serde(default)]
        ignored: Vec<String>,
        /// Ascending and contiguous; see [`BandedLadder::new`].
        bands: Vec<TenureBand>,
    },
}

impl LadderConfig {
    /// Validate and build the ladder.
    pub fn build(&self, name: &str) -> Result<Box<dyn RankLadder>, LadderError> {
        match self {
            LadderConfig::Threshold {
                ranks,
                ignored,
                rungs,
            } => {
                let order = RankOrder::new(ranks.iter().cloned(), ignored.iter().cloned())?;
                Ok(Box::new(ThresholdLadder::new(name, order, rungs.clone())?))
            }
            LadderConfig::Banded {
                ranks,
                ignored,
                bands,
            } => {
                let order = RankOrder::new(ranks.iter().cloned(), ignored.iter().cloned())?;
                Ok(Box::new(BandedLadder::new(name, order, bands.clone())?))
            }
        }
    }
}

// ─── Config tree ─────────────────────────────────────────────────────

/// Per-game settings. Paths are relative to `data_dir` unless absolute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub roster: Option<PathBuf>,
    pub inactivity: Option<PathBuf>,
    /// Absent means the built-in ladder for the game.
    pub ladder: Option<LadderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub osrs: GameConfig,
    pub rs3: GameConfig,
}

/// Audit log settings. No path means no audit log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub path: Option<PathBuf>,
    /// Write an entry even when a run promoted nobody.
    pub record_empty_runs: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub data_dir: PathBuf,
    pub games: GamesConfig,
    pub audit: AuditConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            games: GamesConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn game(&self, game: Game) -> &GameConfig {
        match game {
            Game::Osrs => &self.games.osrs,
            Game::Rs3 => &self.games.rs3,
        }
    }

    pub fn roster_path(&self, game: Game) -> PathBuf {
        let configured = self.game(game).roster.as_deref();
        self.resolve(configured.unwrap_or_else(|| Path::new(game.default_roster())))
    }

    pub fn inactivity_path(&self, game: Game) -> PathBuf {
        let configured = self.game(game).inactivity.as_deref();
        self.resolve(configured.unwrap_or_else(|| Path::new(game.default_inactivity())))
    }

    pub fn audit_path(&self) -> Option<PathBuf> {
        self.audit.path.as_deref().map(|p| self.resolve(p))
    }

    /// The configured ladder for `game`, or the built-in one.
    pub fn ladder(&self, game: Game) -> Result<Box<dyn RankLadder>, ConfigError> {
        match &self.game(game).ladder {
            Some(ladder) => ladder
                .build(game.as_str())
                .map_err(|source| ConfigError::Ladder { game, source }),
            None => Ok(game.builtin_ladder()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

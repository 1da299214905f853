//! Activity registry — per-game lists of members who reported being inactive.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Game, RosterConfig};
use crate::json_file::{self, JsonFileError};

/// Timestamp format stored in `"Date & Time"`.
pub const ACTIVITY_TIME_FORMAT: &str = "%Y-%m-%d %I:%M %p UTC";

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("inactivity list {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown game selection '{0}' (expected osrs, rs3 or both)")]
    UnknownSelection(String),
}

/// One inactivity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactivityEntry {
    #[serde(rename = "Display Name")]
    pub display_name: String,
    #[serde(rename = "Discord User ID")]
    pub user_id: String,
    #[serde(rename = "Date & Time")]
    pub reported_at: String,
}

/// Which games an activity change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSelection {
    Osrs,
    Rs3,
    Both,
}

impl GameSelection {
    pub fn games(self) -> &'static [Game] {
        match self {
            GameSelection::Osrs => &[Game::Osrs],
            GameSelection::Rs3 => &[Game::Rs3],
            GameSelection::Both => &Game::ALL,
        }
    }
}

impl From<Game> for GameSelection {
    fn from(game: Game) -> Self {
        match game {
            Game::Osrs => GameSelection::Osrs,
            Game::Rs3 => GameSelection::Rs3,
        }
    }
}

impl FromStr for GameSelection {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osrs" => Ok(GameSelection::Osrs),
            "rs3" => Ok(GameSelection::Rs3),
            "both" => Ok(GameSelection::Both),
            _ => Err(ActivityError::UnknownSelection(s.to_string())),
        }
    }
}

impl fmt::Display for GameSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameSelection::Osrs => "osrs",
            GameSelection::Rs3 => "rs3",
            GameSelection::Both => "both",
        })
    }
}

/// Inactivity lists for both games, located through the config.
#[derive(Debug, Clone)]
pub struct ActivityRegistry {
    osrs: PathBuf,
    rs3: PathBuf,
}

impl ActivityRegistry {
    pub fn new(osrs: impl Into<PathBuf>, rs3: impl Into<PathBuf>) -> Self {
        Self {
            osrs: osrs.into(),
            rs3: rs3.into(),
        }
    }

    pub fn from_config(config: &RosterConfig) -> Self {
        Self::new(
            config.inactivity_path(Game::Osrs),
            config.inactivity_path(Game::Rs3),
        )
    }

    fn path(&self, game: Game) -> &Path {
        match game {
            Game::Osrs => &self.osrs,
            Game::Rs3 => &self.rs3,
        }
    }

    /// Current entries for `game`; a missing file is an empty list.
    pub fn list(&self, game: Game) -> Result<Vec<InactivityEntry>, ActivityError> {
        let path = self.path(game);
        match json_file::read(path) {
            Ok(entries) => Ok(entries),
            Err(JsonFileError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(map_err(path, e)),
        }
    }

    fn save(&self, game: Game, entries: &[InactivityEntry]) -> Result<(), ActivityError> {
        let path = self.path(game);
        json_file::write_atomic(path, &entries).map_err(|e| map_err(path, e))
    }

    /// Add `user_id` to each selected list it is not already on.
    ///
    /// Returns the games whose list changed. `display_name` falls back to
    /// `Unknown (<id>)`.
    pub fn mark_inactive(
        &self,
        selection: GameSelection,
        user_id: &str,
        display_name: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<Vec<Game>, ActivityError> {
        let display_name = display_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown ({user_id})"));
        let mut changed = Vec::new();

        for &game in selection.games() {
            let mut entries = self.list(game)?;
            if entries.iter().any(|e| e.user_id == user_id) {
                continue;
            }
            entries.push(InactivityEntry {
                display_name: display_name.clone(),
                user_id: user_id.to_string(),
                reported_at: now.format(ACTIVITY_TIME_FORMAT).to_string(),
            });
            self.save(game, &entries)?;
            tracing::info!(%game, user_id, "marked inactive");
            changed.push(game);
        }
        Ok(changed)
    }

    /// Remove `user_id` from each selected list. Returns the games whose list changed.
    pub fn mark_active(
        &self,
        selection: GameSelection,
        user_id: &str,
    ) -> Result<Vec<Game>, ActivityError> {
        let mut changed = Vec::new();

        for &game in selection.games() {
            let mut entries = self.list(game)?;
            let before = entries.len();
            entries.retain(|e| e.user_id != user_id);
            if entries.len() == before {
                continue;
            }
            self.save(game, &entries)?;
            tracing::info!(%game, user_id, "marked active");
            changed.push(game);
        }
        Ok(changed)
    }
}

fn map_err(path: &Path, err: JsonFileError) -> ActivityError {
    let path = path.to_path_buf();
    match err {
        JsonFileError::NotFound => ActivityError::Io {
            path,
            source: io::ErrorKind::NotFound.into(),
        },
        JsonFileError::Io(source) => ActivityError::Io { path, source },
        JsonFileError::Json(source) => ActivityError::Corrupt { path, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 3)
            .unwrap()
            .and_hms_opt(15, 7, 0)
            .unwrap()
    }

    fn registry(dir: &Path) -> ActivityRegistry {
        ActivityRegistry::new(dir.join("osrs.json"), dir.join("rs3.json"))
    }

    #[test]
    fn missing_list_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(registry(dir.path()).list(Game::Osrs).unwrap().is_empty());
    }

    #[test]
    fn mark_inactive_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());

        let changed = reg
            .mark_inactive(GameSelection::Osrs, "42", Some("Aria"), now())
            .unwrap();
        assert_eq!(changed, vec![Game::Osrs]);

        let changed = reg
            .mark_inactive(GameSelection::Both, "42", Some("Aria"), now())
            .unwrap();
        assert_eq!(changed, vec![Game::Rs3]);

        let changed = reg
            .mark_inactive(GameSelection::Both, "42", Some("Aria"), now())
            .unwrap();
        assert!(changed.is_empty());

        let entries = reg.list(Game::Osrs).unwrap();
        assert_eq!(
            entries,
            vec![InactivityEntry {
                display_name: "Aria".into(),
                user_id: "42".into(),
                reported_at: "2025-02-03 03:07 PM UTC".into(),
            }]
        );
    }

    #[test]
    fn display_name_falls_back_to_user_id() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        reg.mark_inactive(GameSelection::Rs3, "77", None, now()).unwrap();
        assert_eq!(reg.list(Game::Rs3).unwrap()[0].display_name, "Unknown (77)");
    }

    #[test]
    fn mark_active_reports_only_changed_games() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        reg.mark_inactive(GameSelection::Rs3, "42", Some("Aria"), now())
            .unwrap();
        reg.mark_inactive(GameSelection::Rs3, "43", Some("Bo"), now())
            .unwrap();

        assert_eq!(
            reg.mark_active(GameSelection::Both, "42").unwrap(),
            vec![Game::Rs3]
        );
        assert!(reg.mark_active(GameSelection::Both, "42").unwrap().is_empty());
        assert_eq!(reg.list(Game::Rs3).unwrap().len(), 1);
    }

    #[test]
    fn stored_json_uses_display_keys() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(dir.path());
        reg.mark_inactive(GameSelection::Osrs, "42", Some("Aria"), now())
            .unwrap();
        let text = std::fs::read_to_string(dir.path().join("osrs.json")).unwrap();
        assert!(text.contains("\"Display Name\": \"Aria\""));
        assert!(text.contains("\"Discord User ID\": \"42\""));
        assert!(text.contains("\"Date & Time\""));
    }

    #[test]
    fn selection_parses() {
        assert_eq!("Both".parse::<GameSelection>().unwrap(), GameSelection::Both);
        assert!("all".parse::<GameSelection>().is_err());
        assert_eq!(GameSelection::from(Game::Rs3).games(), &[Game::Rs3]);
    }
}

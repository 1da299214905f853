//! Roster store — one game's member list as a JSON file on disk.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use rosterlab_core::domain::{format_join_date, parse_join_date};
use rosterlab_core::evaluator::member_order;
use rosterlab_core::RosterSnapshot;

use crate::json_file::{self, JsonFileError};

/// Errors from the roster store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The roster has never been fetched or imported.
    #[error("roster data unavailable: {} does not exist", .path.display())]
    DataUnavailable { path: PathBuf },
    #[error("roster file {} is not a valid roster: {source}", .path.display())]
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
    #[error("member '{0}' not found in the roster")]
    UnknownMember(String),
    #[error("invalid join date '{0}', expected MM/DD/YYYY")]
    InvalidDate(String),
}

/// JSON roster file for a single game.
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the whole roster.
    pub fn load(&self) -> Result<RosterSnapshot, StoreError> {
        json_file::read(&self.path).map_err(|e| self.map_err(e))
    }

    /// Replace the roster on disk.
    pub fn save(&self, roster: &RosterSnapshot) -> Result<(), StoreError> {
        json_file::write_atomic(&self.path, roster).map_err(|e| self.map_err(e))
    }

    /// Stored join date for `member`, possibly the `"Unknown"` sentinel.
    pub fn join_date(&self, member: &str) -> Result<String, StoreError> {
        let roster = self.load()?;
        roster
            .get(member)
            .map(|record| record.join_date_str().to_string())
            .ok_or_else(|| StoreError::UnknownMember(member.to_string()))
    }

    /// Record a join date for `member` and rewrite the file.
    ///
    /// Returns the date as stored (normalized to zero-padded `MM/DD/YYYY`).
    pub fn set_join_date(&self, member: &str, date: &str) -> Result<String, StoreError> {
        let parsed =
            parse_join_date(date).ok_or_else(|| StoreError::InvalidDate(date.to_string()))?;
        let mut roster = self.load()?;
        let record = roster
            .get_mut(member)
            .ok_or_else(|| StoreError::UnknownMember(member.to_string()))?;
        let stored = format_join_date(parsed);
        record.set_join_date(stored.clone());
        self.save(&roster)?;
        tracing::info!(member, join_date = %stored, "join date updated");
        Ok(stored)
    }

    /// Members whose join date is missing or `"Unknown"`, case-insensitively sorted.
    pub fn members_without_join_date(&self) -> Result<Vec<String>, StoreError> {
        let roster = self.load()?;
        let mut names: Vec<String> = roster
            .iter()
            .filter(|(_, record)| !record.has_known_join_date())
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort_by(|a, b| member_order(a, b));
        Ok(names)
    }

    fn map_err(&self, err: JsonFileError) -> StoreError {
        let path = self.path.clone();
        match err {
            JsonFileError::NotFound => StoreError::DataUnavailable { path },
            JsonFileError::Io(source) => StoreError::Io { path, source },
            JsonFileError::Json(source) => StoreError::Corrupt { path, source },
        }
    }
}

//! Promotion audit log — JSONL append-only record of promotion runs.
//!
//! One JSON object per line, so a partially written line never corrupts the
//! entries before it. Runs that promoted nobody are skipped unless
//! `record_empty_runs` is set.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use rosterlab_core::PromotionRecord;

use crate::config::{Game, RosterConfig};
use crate::runner::PromotionReport;

/// One audited run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub game: Game,
    pub evaluated_at: NaiveDateTime,
    /// BLAKE3 of the roster snapshot the run evaluated.
    pub roster_hash: String,
    pub promotions: Vec<PromotionRecord>,
}

impl From<&PromotionReport> for AuditEntry {
    fn from(report: &PromotionReport) -> Self {
        Self {
            game: report.game,
            evaluated_at: report.evaluated_at,
            roster_hash: report.roster_hash.clone(),
            promotions: report.promotions.clone(),
        }
    }
}

/// JSONL audit file.
pub struct AuditLog {
    path: PathBuf,
    record_empty_runs: bool,
}

impl AuditLog {
    pub fn new(path: PathBuf, record_empty_runs: bool) -> Self {
        Self {
            path,
            record_empty_runs,
        }
    }

    /// The configured audit log, if any.
    pub fn from_config(config: &RosterConfig) -> Option<Self> {
        config
            .audit_path()
            .map(|path| Self::new(path, config.audit.record_empty_runs))
    }

    /// Append `entry`. Returns `Ok(false)` when an empty run was not recorded.
    pub fn append(&self, entry: &AuditEntry) -> io::Result<bool> {
        if entry.promotions.is_empty() && !self.record_empty_runs {
            return Ok(false);
        }

        let json = serde_json::to_string(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{json}")?;
        file.flush()?;

        Ok(true)
    }

    /// Read all entries, skipping malformed lines.
    pub fn read_all(&self) -> io::Result<Vec<AuditEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        let mut entries = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(line = index + 1, error = %e, "skipping malformed audit line"),
            }
        }

        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

//! Promotion runner — load a game's roster, evaluate it, format the result.
//!
//! Two entry points:
//! - `run_promotions()`: loads the roster from the configured store, evaluates
//!   it and appends to the audit log when one is configured. A failed audit
//!   write is logged and does not discard the report. Used by the CLI.
//! - `evaluate_snapshot()`: takes an already loaded snapshot and a ladder. No I/O.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rosterlab_core::{
    evaluate_detailed, format_summary, PromotionRecord, PromotionSummary, RankLadder,
    RosterSnapshot, SkippedMember,
};

use crate::audit::{AuditEntry, AuditLog};
use crate::config::{ConfigError, Game, RosterConfig};
use crate::store::{RosterStore, StoreError};

/// Errors from a promotion run. Any of these means no promotions were produced.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("roster error: {0}")]
    Store(#[from] StoreError),
    #[error("hash roster snapshot: {0}")]
    Hash(#[from] serde_json::Error),
}

/// Complete result of one promotion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionReport {
    pub game: Game,
    pub evaluated_at: NaiveDateTime,
    pub member_count: usize,
    /// BLAKE3 hex digest of the snapshot's canonical JSON.
    pub roster_hash: String,
    pub promotions: Vec<PromotionRecord>,
    pub skipped: Vec<SkippedMember>,
    pub summary: PromotionSummary,
}

/// Run promotions for `game` as of `now`.
pub fn run_promotions(
    game: Game,
    config: &RosterConfig,
    now: NaiveDateTime,
) -> Result<PromotionReport, RunError> {
    let ladder = config.ladder(game)?;
    let store = RosterStore::new(config.roster_path(game));
    let roster = store.load()?;

    let report = evaluate_snapshot(game, ladder.as_ref(), &roster, now)?;

    if let Some(audit) = AuditLog::from_config(config) {
        match audit.append(&AuditEntry::from(&report)) {
            Ok(written) => {
                tracing::debug!(path = %audit.path().display(), written, "audit log");
            }
            Err(e) => {
                tracing::warn!(
                    path = %audit.path().display(),
                    error = %e,
                    "audit log write failed, promotions still reported"
                );
            }
        }
    }

    Ok(report)
}

/// Evaluate an in-memory snapshot with `ladder`.
pub fn evaluate_snapshot(
    game: Game,
    ladder: &dyn RankLadder,
    roster: &RosterSnapshot,
    now: NaiveDateTime,
) -> Result<PromotionReport, RunError> {
    let roster_hash = roster_hash(roster)?;
    let evaluation = evaluate_detailed(ladder, roster, now);

    for skipped in &evaluation.skipped {
        tracing::debug!(%game, member = %skipped.member, reason = %skipped.reason, "member skipped");
    }
    if roster.is_empty() {
        tracing::warn!(%game, "roster is empty");
    }
    tracing::info!(
        %game,
        ladder = ladder.name(),
        members = roster.len(),
        promotions = evaluation.promotions.len(),
        skipped = evaluation.skipped.len(),
        "promotion run complete"
    );

    let summary = format_summary(&evaluation.promotions);
    Ok(PromotionReport {
        game,
        evaluated_at: now,
        member_count: roster.len(),
        roster_hash,
        promotions: evaluation.promotions,
        skipped: evaluation.skipped,
        summary,
    })
}

/// BLAKE3 of the snapshot's JSON. Member order is canonical (sorted map).
pub fn roster_hash(roster: &RosterSnapshot) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(roster)?;
    Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
}

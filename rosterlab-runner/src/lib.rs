//! Rosterlab Runner — roster storage, import, activity tracking, promotion runs.
//!
//! This crate builds on `rosterlab-core` to provide:
//! - TOML configuration with per-game ladders and data paths
//! - JSON roster store (load, atomic save, join-date maintenance)
//! - CSV members-export import that merges into the store
//! - Per-game inactivity registry
//! - Promotion runs with a content hash of the evaluated snapshot
//! - JSONL audit log of runs

pub mod activity;
pub mod audit;
pub mod config;
pub mod import;
mod json_file;
pub mod runner;
pub mod store;

pub use activity::{ActivityError, ActivityRegistry, GameSelection, InactivityEntry};
pub use audit::{AuditEntry, AuditLog};
pub use config::{AuditConfig, ConfigError, Game, GameConfig, LadderConfig, RosterConfig};
pub use import::{import_file, import_members, ExportRow, ImportError, ImportSummary};
pub use runner::{evaluate_snapshot, roster_hash, run_promotions, PromotionReport, RunError};
pub use store::{RosterStore, StoreError};

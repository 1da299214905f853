//! Rosterlab Core — roster domain types, rank ladders, promotion evaluation.
//!
//! This crate contains the promotion rule engine:
//! - Roster snapshot types in the roster store's JSON shape
//! - Rank order with case-insensitive priority and ignored ranks
//! - Two ladder shapes behind one `RankLadder` trait (threshold, banded)
//! - A pure evaluator that turns a snapshot plus "now" into promotion records
//! - Summary formatting for announcements and the operator audit trace

pub mod domain;
pub mod evaluator;
pub mod ladder;
pub mod summary;

pub use domain::{MemberRecord, PromotionRecord, RosterSnapshot, SkipReason, SkippedMember};
pub use evaluator::{evaluate, evaluate_detailed, Evaluation};
pub use ladder::{
    BandedLadder, LadderError, PromotionRung, RankLadder, RankOrder, TenureBand, ThresholdLadder,
};
pub use summary::{format_summary, PromotionSummary, NO_PROMOTIONS_MESSAGE};

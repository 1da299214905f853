//! Domain types: roster snapshots and promotion records.

pub mod promotion;
pub mod roster;

pub use promotion::{PromotionRecord, SkipReason, SkippedMember};
pub use roster::{
    format_join_date, parse_join_date, tenure_days, MemberRecord, RosterSnapshot,
    JOIN_DATE_FORMAT, UNKNOWN_JOIN_DATE,
};

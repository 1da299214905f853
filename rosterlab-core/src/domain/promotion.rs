//! Promotion records produced by an evaluation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One member moving up the ladder.
///
/// Only ever built by the evaluator, and only when `new_rank` strictly
/// outranks `current_rank` on the ladder that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromotionRecord {
    pub member: String,
    /// Join date exactly as stored (`MM/DD/YYYY`).
    pub join_date: String,
    pub current_rank: String,
    pub new_rank: String,
}

impl fmt::Display for PromotionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.member, self.current_rank, self.new_rank)
    }
}

/// Why a member was left out of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `"Clan Rank"` holds something other than a string.
    MalformedRank,
    /// Terminal or administrative rank.
    IgnoredRank,
    /// Join date is the `"Unknown"` sentinel.
    UnknownJoinDate,
    /// Join date present but not `MM/DD/YYYY`.
    MalformedJoinDate,
    /// `"Total XP"` is not a non-negative integer.
    MalformedExperience,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MalformedRank => "malformed rank",
            Self::IgnoredRank => "ignored rank",
            Self::UnknownJoinDate => "unknown join date",
            Self::MalformedJoinDate => "malformed join date",
            Self::MalformedExperience => "malformed experience",
        };
        f.write_str(text)
    }
}

/// A member excluded from evaluation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMember {
    pub member: String,
    pub reason: SkipReason,
}

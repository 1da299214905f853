//! Rank ladders — the per-game rules that map tenure and experience to a rank.
//!
//! Two shapes share one capability:
//! - [`ThresholdLadder`]: rungs gated on tenure AND experience; every rung is
//!   checked so long-unevaluated members catch up in one step.
//! - [`BandedLadder`]: disjoint tenure bands, each naming one target rank.
//!
//! Both only ever propose a rank that strictly outranks the current one.
//! Demotions are never produced.

pub mod banded;
pub mod order;
pub mod threshold;

pub use banded::{BandedLadder, TenureBand};
pub use order::RankOrder;
pub use threshold::{PromotionRung, ThresholdLadder};

use thiserror::Error;

/// Rules for advancing members of one game's clan.
pub trait RankLadder: Send + Sync {
    /// Ladder name (for logging/reporting).
    fn name(&self) -> &str;

    /// Rank order and ignored set this ladder evaluates against.
    fn order(&self) -> &RankOrder;

    /// Highest rank reachable with the given tenure and experience, if it
    /// strictly outranks `current_rank`.
    fn resolve_candidate(
        &self,
        current_rank: &str,
        tenure_days: i64,
        experience: u64,
    ) -> Option<&str>;
}

/// Invalid ladder definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    #[error("rank order is empty")]
    EmptyOrder,
    #[error("rank '{0}' appears more than once in the rank order")]
    DuplicateRank(String),
    #[error("{context} references rank '{rank}' which is not in the rank order")]
    UnknownRank { rank: String, context: String },
    #[error("banded ladder has no bands")]
    NoBands,
    #[error("band {index} has min_days {min} greater than max_days {max}")]
    InvertedBand { index: usize, min: i64, max: i64 },
    #[error("band {index} has invalid bounds: the first band must be open below, the last open above, and every other bound closed")]
    BandBounds { index: usize },
    #[error("band {index} must start at {expected} days to follow the previous band, found {found:?}")]
    BandDiscontinuity {
        index: usize,
        expected: i64,
        found: Option<i64>,
    },
}

//! Promotion evaluator — one pass over a roster snapshot against a ladder.
//!
//! Pure and synchronous: the snapshot is borrowed read-only and "now" is a
//! parameter, so two calls with the same inputs return the same records.
//! Members that cannot be evaluated (ignored rank, unknown join date, or a
//! malformed rank, join date or experience value) are skipped without failing
//! the batch.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::domain::{
    parse_join_date, tenure_days, PromotionRecord, RosterSnapshot, SkipReason, SkippedMember,
    UNKNOWN_JOIN_DATE,
};
use crate::ladder::RankLadder;

/// Full outcome of an evaluation, including who was left out and why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Sorted case-insensitively by member name.
    pub promotions: Vec<PromotionRecord>,
    /// Sorted the same way.
    pub skipped: Vec<SkippedMember>,
}

/// Promotions for every eligible member of `roster` at `now`.
pub fn evaluate(
    ladder: &dyn RankLadder,
    roster: &RosterSnapshot,
    now: NaiveDateTime,
) -> Vec<PromotionRecord> {
    evaluate_detailed(ladder, roster, now).promotions
}

/// Like [`evaluate`], but also reports the members that were skipped.
pub fn evaluate_detailed(
    ladder: &dyn RankLadder,
    roster: &RosterSnapshot,
    now: NaiveDateTime,
) -> Evaluation {
    let order = ladder.order();
    let mut evaluation = Evaluation::default();

    for (member, record) in roster.iter() {
        let current_rank = record.rank_or(order.lowest());
        let join_date_str = record.join_date_str();

        let skip = if record.has_malformed_rank() {
            Some(SkipReason::MalformedRank)
        } else if order.is_ignored(current_rank) {
            Some(SkipReason::IgnoredRank)
        } else if record.has_malformed_join_date() {
            Some(SkipReason::MalformedJoinDate)
        } else if join_date_str == UNKNOWN_JOIN_DATE {
            Some(SkipReason::UnknownJoinDate)
        } else if record.has_malformed_experience() {
            Some(SkipReason::MalformedExperience)
        } else {
            None
        };
        if let Some(reason) = skip {
            evaluation.skipped.push(SkippedMember {
                member: member.to_string(),
                reason,
            });
            continue;
        }

        let Some(join_date) = parse_join_date(join_date_str) else {
            evaluation.skipped.push(SkippedMember {
                member: member.to_string(),
                reason: SkipReason::MalformedJoinDate,
            });
            continue;
        };

        let days = tenure_days(join_date, now);
        let Some(candidate) = ladder.resolve_candidate(current_rank, days, record.experience())
        else {
            continue;
        };

        // Ladders already filter, but the record invariant is enforced here too.
        if !order.outranks(candidate, current_rank) {
            continue;
        }

        evaluation.promotions.push(PromotionRecord {
            member: member.to_string(),
            join_date: join_date_str.to_string(),
            current_rank: order.canonical(current_rank).unwrap_or(current_rank).to_string(),
            new_rank: candidate.to_string(),
        });
    }

    evaluation
        .promotions
        .sort_by(|a, b| member_order(&a.member, &b.member));
    evaluation
        .skipped
        .sort_by(|a, b| member_order(&a.member, &b.member));
    evaluation
}

/// Case-insensitive ascending; exact spelling breaks ties so order is total.
pub fn member_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

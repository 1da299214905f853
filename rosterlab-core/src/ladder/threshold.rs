//! Threshold ladder — tenure AND experience gated rungs (Old School RuneScape).
//!
//! Each rung says "a member may hold `to` once in the clan for
//! `min_tenure_days` with at least `min_experience`". Resolution checks every
//! rung, not just the one leaving the member's current rank, and picks the
//! highest-priority target the member qualifies for. A thief who went
//! unevaluated for months lands directly on the highest rung they satisfy.

use serde::{Deserialize, Serialize};

use super::{LadderError, RankLadder, RankOrder};

/// One step of a threshold ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRung {
    /// Rank the step leaves. Informational; resolution does not require it.
    pub from: String,
    /// Rank the step grants.
    pub to: String,
    pub min_tenure_days: i64,
    pub min_experience: u64,
}

impl PromotionRung {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        min_tenure_days: i64,
        min_experience: u64,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            min_tenure_days,
            min_experience,
        }
    }

    /// Both gates are inclusive.
    pub fn is_met(&self, tenure_days: i64, experience: u64) -> bool {
        tenure_days >= self.min_tenure_days && experience >= self.min_experience
    }
}

#[derive(Debug, Clone)]
struct IndexedRung {
    rung: PromotionRung,
    target: usize,
}

/// Ladder whose rungs are gated on tenure and experience together.
#[derive(Debug, Clone)]
pub struct ThresholdLadder {
    name: String,
    order: RankOrder,
    rungs: Vec<IndexedRung>,
}

impl ThresholdLadder {
    /// Build a ladder, checking that every rung names ranks from `order`.
    pub fn new(
        name: impl Into<String>,
        order: RankOrder,
        rungs: Vec<PromotionRung>,
    ) -> Result<Self, LadderError> {
        for rung in &rungs {
            for rank in [&rung.from, &rung.to] {
                if order.priority(rank).is_none() {
                    return Err(LadderError::UnknownRank {
                        rank: rank.clone(),
                        context: format!("rung {} -> {}", rung.from, rung.to),
                    });
                }
            }
        }
        Ok(Self::assemble(name.into(), order, rungs))
    }

    fn assemble(name: String, order: RankOrder, rungs: Vec<PromotionRung>) -> Self {
        let rungs = rungs
            .into_iter()
            .filter_map(|rung| {
                order
                    .priority(&rung.to)
                    .map(|target| IndexedRung { rung, target })
            })
            .collect();
        Self { name, order, rungs }
    }

    /// Built-in Old School RuneScape ladder: thief through captain.
    ///
    /// Ranks above captain are part of the order (so holders are never
    /// pulled down) but have no rungs; configuration can add them.
    pub fn osrs() -> Self {
        let order = RankOrder::assemble(OSRS_RANKS, OSRS_IGNORED);
        let rungs = OSRS_RUNGS
            .iter()
            .map(|&(from, to, days, xp)| PromotionRung::new(from, to, days, xp))
            .collect();
        Self::assemble("osrs".into(), order, rungs)
    }

    pub fn rungs(&self) -> impl Iterator<Item = &PromotionRung> {
        self.rungs.iter().map(|r| &r.rung)
    }
}

impl RankLadder for ThresholdLadder {
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> &RankOrder {
        &self.order
    }

    fn resolve_candidate(
        &self,
        current_rank: &str,
        tenure_days: i64,
        experience: u64,
    ) -> Option<&str> {
        let current = self.order.priority(current_rank);
        let best = self
            .rungs
            .iter()
            .filter(|r| r.rung.is_met(tenure_days, experience))
            .map(|r| r.target)
            .max()?;

        if Some(best) > current {
            self.order.name_at(best)
        } else {
            None
        }
    }
}

// ─── Built-in data ───────────────────────────────────────────────────

pub(crate) const OSRS_RANKS: [&str; 13] = [
    "thief",
    "recruit",
    "corporal",
    "sergeant",
    "lieutenant",
    "captain",
    "general",
    "officer",
    "commander",
    "colonel",
    "brigadier",
    "admiral",
    "marshal",
];

pub(crate) const OSRS_IGNORED: [&str; 14] = [
    "diamond",
    "onyx",
    "administrator",
    "gnome elder",
    "mentor",
    "prefect",
    "supervisor",
    "leader",
    "superior",
    "executive",
    "coordinator",
    "moderator",
    "deputy owner",
    "owner",
];

pub(crate) const OSRS_RUNGS: [(&str, &str, i64, u64); 5] = [
    ("thief", "recruit", 14, 50_000),
    ("recruit", "corporal", 44, 100_000),
    ("corporal", "sergeant", 94, 500_000),
    ("sergeant", "lieutenant", 154, 1_000_000),
    ("lieutenant", "captain", 214, 2_000_000),
];

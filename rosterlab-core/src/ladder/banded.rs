//! Banded ladder — tenure-only day bands (RuneScape 3).
//!
//! Bands are contiguous, disjoint and cover every tenure value, so exactly
//! one band applies to any member. The band's rank is proposed only when it
//! outranks the member's current rank.

use serde::{Deserialize, Serialize};

use super::{LadderError, RankLadder, RankOrder};

/// Inclusive day range mapped to one rank. `None` bounds are open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureBand {
    #[serde(default)]
    pub min_days: Option<i64>,
    #[serde(default)]
    pub max_days: Option<i64>,
    pub rank: String,
}

impl TenureBand {
    pub fn new(min_days: Option<i64>, max_days: Option<i64>, rank: impl Into<String>) -> Self {
        Self {
            min_days,
            max_days,
            rank: rank.into(),
        }
    }

    pub fn contains(&self, tenure_days: i64) -> bool {
        self.min_days.map_or(true, |min| tenure_days >= min)
            && self.max_days.map_or(true, |max| tenure_days <= max)
    }
}

/// Ladder that assigns a rank purely from tenure.
#[derive(Debug, Clone)]
pub struct BandedLadder {
    name: String,
    order: RankOrder,
    bands: Vec<TenureBand>,
}

impl BandedLadder {
    /// Build a ladder from bands listed in ascending order.
    ///
    /// The first band must be open below, the last open above, and each band
    /// must start the day after the previous one ends.
    pub fn new(
        name: impl Into<String>,
        order: RankOrder,
        bands: Vec<TenureBand>,
    ) -> Result<Self, LadderError> {
        validate_bands(&order, &bands)?;
        Ok(Self {
            name: name.into(),
            order,
            bands,
        })
    }

    /// Built-in RuneScape 3 ladder.
    pub fn rs3() -> Self {
        Self {
            name: "rs3".into(),
            order: RankOrder::assemble(RS3_RANKS, RS3_IGNORED),
            bands: rs3_bands(),
        }
    }

    /// The band covering `tenure_days`.
    pub fn band_for(&self, tenure_days: i64) -> Option<&TenureBand> {
        self.bands.iter().find(|band| band.contains(tenure_days))
    }

    pub fn bands(&self) -> &[TenureBand] {
        &self.bands
    }
}

impl RankLadder for BandedLadder {
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
        _experience: u64,
    ) -> Option<&str> {
        let band = self.band_for(tenure_days)?;
        if self.order.outranks(&band.rank, current_rank) {
            self.order.canonical(&band.rank)
        } else {
            None
        }
    }
}

fn validate_bands(order: &RankOrder, bands: &[TenureBand]) -> Result<(), LadderError> {
    let last = match bands.len() {
        0 => return Err(LadderError::NoBands),
        n => n - 1,
    };

    for (index, band) in bands.iter().enumerate() {
        if order.priority(&band.rank).is_none() {
            return Err(LadderError::UnknownRank {
                rank: band.rank.clone(),
                context: format!("band {index}"),
            });
        }
        let open_below_ok = band.min_days.is_none() == (index == 0);
        let open_above_ok = band.max_days.is_none() == (index == last);
        if !open_below_ok || !open_above_ok {
            return Err(LadderError::BandBounds { index });
        }
        if let (Some(min), Some(max)) = (band.min_days, band.max_days) {
            if min > max {
                return Err(LadderError::InvertedBand { index, min, max });
            }
        }
        if index > 0 {
            // The previous band is bounded above, checked on its own iteration.
            let expected = bands[index - 1].max_days.unwrap_or(i64::MAX).saturating_add(1);
            if band.min_days != Some(expected) {
                return Err(LadderError::BandDiscontinuity {
                    index,
                    expected,
                    found: band.min_days,
                });
            }
        }
    }

    Ok(())
}

// ─── Built-in data ───────────────────────────────────────────────────

pub(crate) const RS3_RANKS: [&str; 5] = ["Recruit", "Corporal", "Sergeant", "Lieutenant", "Captain"];

pub(crate) const RS3_IGNORED: [&str; 6] = [
    "Captain",
    "General",
    "Overseer",
    "Admin",
    "Deputy Owner",
    "Owner",
];

fn rs3_bands() -> Vec<TenureBand> {
    vec![
        TenureBand::new(None, Some(30), "Recruit"),
        TenureBand::new(Some(31), Some(90), "Corporal"),
        TenureBand::new(Some(91), Some(180), "Sergeant"),
        TenureBand::new(Some(181), Some(365), "Lieutenant"),
        TenureBand::new(Some(366), None, "Captain"),
    ]
}

//! Rank order — strict total order of rank names plus the ignored set.

use std::collections::BTreeSet;

use super::LadderError;

/// Ordered rank names (priority = position) and the terminal/administrative
/// ranks that are never evaluated.
///
/// All lookups are case-insensitive. Ignored ranks do not have to appear in
/// the order; a rank may be both ordered and ignored (RS3 captains are).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOrder {
    ranks: Vec<String>,
    keys: Vec<String>,
    ignored: BTreeSet<String>,
}

impl RankOrder {
    /// Build an order, rejecting empty or duplicated rank lists.
    pub fn new<R, I>(ranks: R, ignored: I) -> Result<Self, LadderError>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let order = Self::assemble(ranks, ignored);
        if order.ranks.is_empty() {
            return Err(LadderError::EmptyOrder);
        }
        let mut seen = BTreeSet::new();
        for (rank, key) in order.ranks.iter().zip(&order.keys) {
            if !seen.insert(key.as_str()) {
                return Err(LadderError::DuplicateRank(rank.clone()));
            }
        }
        Ok(order)
    }

    pub(crate) fn assemble<R, I>(ranks: R, ignored: I) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let ranks: Vec<String> = ranks.into_iter().map(Into::into).collect();
        let keys = ranks.iter().map(|r| fold(r)).collect();
        let ignored = ignored
            .into_iter()
            .map(|r| {
                let r: String = r.into();
                fold(&r)
            })
            .collect();
        Self {
            ranks,
            keys,
            ignored,
        }
    }

    /// Position of `rank` in the order; `None` when unrecognized.
    ///
    /// `None` compares below every `Some`, so an unrecognized rank sits
    /// beneath the whole ladder.
    pub fn priority(&self, rank: &str) -> Option<usize> {
        let key = fold(rank);
        self.keys.iter().position(|k| *k == key)
    }

    /// Ladder spelling of a recognized rank.
    pub fn canonical(&self, rank: &str) -> Option<&str> {
        self.priority(rank).map(|p| self.ranks[p].as_str())
    }

    /// Rank name at a priority position.
    pub fn name_at(&self, priority: usize) -> Option<&str> {
        self.ranks.get(priority).map(String::as_str)
    }

    pub fn is_ignored(&self, rank: &str) -> bool {
        self.ignored.contains(&fold(rank))
    }

    /// True when `candidate` strictly outranks `current`.
    pub fn outranks(&self, candidate: &str, current: &str) -> bool {
        match self.priority(candidate) {
            Some(p) => Some(p) > self.priority(current),
            None => false,
        }
    }

    /// Default rank for members without one: the bottom of the order.
    pub fn lowest(&self) -> &str {
        self.ranks.first().map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

fn fold(rank: &str) -> String {
    rank.to_lowercase()
}

//! Summary formatting — the announcement text and the operator audit trace.

use serde::{Deserialize, Serialize};

use crate::domain::PromotionRecord;

/// Message presenters show when a run produced no promotions.
pub const NO_PROMOTIONS_MESSAGE: &str = "No promotions were processed.";

/// Rendered output of one promotion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionSummary {
    /// Numbered announcement lines; `None` when nothing was promoted.
    pub human: Option<String>,
    /// `member: from -> to` lines for the debugging channel; empty when nothing was promoted.
    pub debug_trace: String,
}

impl PromotionSummary {
    /// Announcement text, or [`NO_PROMOTIONS_MESSAGE`].
    pub fn human_or_default(&self) -> &str {
        self.human.as_deref().unwrap_or(NO_PROMOTIONS_MESSAGE)
    }
}

/// Render `records` in the order given (callers pass evaluator output, already sorted).
pub fn format_summary(records: &[PromotionRecord]) -> PromotionSummary {
    let human = if records.is_empty() {
        None
    } else {
        Some(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    format!(
                        "{}. {} has been promoted from {} to **{}**!",
                        i + 1,
                        r.member,
                        r.current_rank,
                        r.new_rank
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    };

    let debug_trace = records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    PromotionSummary { human, debug_trace }
}

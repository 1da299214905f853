//! Property tests for merging a members export into an existing roster.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rosterlab_core::{MemberRecord, RosterSnapshot};
use rosterlab_runner::import::merge;
use rosterlab_runner::ExportRow;

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Ea-e]{1,3}"
}

fn arb_existing() -> impl Strategy<Value = RosterSnapshot> {
    prop::collection::btree_map(
        arb_name(),
        (0u32..400, 0u64..1_000_000).prop_map(|(day, xp)| {
            MemberRecord::new("Recruit", format!("01/01/{}", 2000 + day % 25), xp)
        }),
        0..12,
    )
    .prop_map(|members| members.into_iter().collect())
}

fn arb_rows() -> impl Strategy<Value = Vec<ExportRow>> {
    prop::collection::btree_map(arb_name(), (0u64..1_000_000, 0u64..50), 1..12).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(name, (experience, kills))| ExportRow {
                    name,
                    rank: "Corporal".into(),
                    experience,
                    kills,
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn merged_roster_is_exactly_the_export(existing in arb_existing(), rows in arb_rows()) {
        let (merged, summary) = merge(&existing, &rows);

        let exported: BTreeSet<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        let kept: BTreeSet<&str> = merged.names().collect();
        prop_assert_eq!(&kept, &exported);

        for name in &summary.removed {
            prop_assert!(existing.contains(name) && !merged.contains(name));
        }
        for name in &summary.added {
            prop_assert!(!existing.contains(name));
        }
        prop_assert_eq!(
            summary.removed.len() + kept.len(),
            existing.len() + summary.added.len()
        );
    }

    #[test]
    fn join_dates_survive_reimport(existing in arb_existing(), rows in arb_rows()) {
        let (merged, _) = merge(&existing, &rows);
        for (name, record) in merged.iter() {
            let expected = existing
                .get(name)
                .map(|previous| previous.join_date_str())
                .unwrap_or("Unknown");
            prop_assert_eq!(record.join_date_str(), expected);
        }
    }
}

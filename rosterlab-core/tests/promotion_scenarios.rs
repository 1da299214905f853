//! End-to-end promotion scenarios against the built-in ladders.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rosterlab_core::domain::format_join_date;
use rosterlab_core::{
    evaluate, format_summary, BandedLadder, MemberRecord, PromotionRecord, RosterSnapshot,
    ThresholdLadder,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10)
        .unwrap()
        .and_hms_opt(18, 45, 0)
        .unwrap()
}

fn days_ago(days: i64) -> String {
    format_join_date(now().date() - Duration::days(days))
}

fn single(name: &str, record: MemberRecord) -> RosterSnapshot {
    let mut roster = RosterSnapshot::new();
    roster.insert(name, record);
    roster
}

#[test]
fn thief_with_fifty_days_becomes_recruit() {
    let date = days_ago(50);
    let roster = single("Aria", MemberRecord::new("thief", date.clone(), 60_000));

    let records = evaluate(&ThresholdLadder::osrs(), &roster, now());
    assert_eq!(
        records,
        vec![PromotionRecord {
            member: "Aria".into(),
            join_date: date,
            current_rank: "thief".into(),
            new_rank: "recruit".into(),
        }]
    );

    let summary = format_summary(&records);
    assert_eq!(
        summary.human.as_deref(),
        Some("1. Aria has been promoted from thief to **recruit**!")
    );
    assert_eq!(summary.debug_trace, "Aria: thief -> recruit");
}

#[test]
fn captain_at_top_of_chain_is_not_promoted() {
    let roster = single("Bo", MemberRecord::new("captain", "01/01/2000", 999_999_999));
    assert!(evaluate(&ThresholdLadder::osrs(), &roster, now()).is_empty());
}

#[test]
fn unknown_join_date_on_banded_ladder_is_inert() {
    let roster = single(
        "Cy",
        MemberRecord {
            rank: Some("Recruit".into()),
            join_date: Some("Unknown".into()),
            ..Default::default()
        },
    );
    assert!(evaluate(&BandedLadder::rs3(), &roster, now()).is_empty());
}

#[test]
fn empty_roster_formats_to_nothing() {
    let records = evaluate(&ThresholdLadder::osrs(), &RosterSnapshot::new(), now());
    let summary = format_summary(&records);
    assert_eq!(summary.human, None);
    assert_eq!(summary.debug_trace, "");
}

#[test]
fn lowest_rank_satisfying_fifth_rung_jumps_to_its_target() {
    let roster = single("Dax", MemberRecord::new("thief", days_ago(214), 2_000_000));
    let records = evaluate(&ThresholdLadder::osrs(), &roster, now());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].new_rank, "captain");
}

#[test]
fn rs3_bands_promote_by_tenure_alone() {
    let mut roster = RosterSnapshot::new();
    roster.insert("Ash", MemberRecord::new("Recruit", days_ago(10), 0));
    roster.insert("bea", MemberRecord::new("Recruit", days_ago(31), 0));
    roster.insert("Cal", MemberRecord::new("Corporal", days_ago(200), 0));
    roster.insert("dot", MemberRecord::new("Sergeant", days_ago(40), 0));
    roster.insert("Eli", MemberRecord::new("Lieutenant", days_ago(800), 0));
    roster.insert("Fay", MemberRecord::new("Captain", days_ago(800), 0));

    let records = evaluate(&BandedLadder::rs3(), &roster, now());
    let summary: Vec<_> = records.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        summary,
        vec![
            "bea: Recruit -> Corporal",
            "Cal: Corporal -> Lieutenant",
            "Eli: Lieutenant -> Captain",
        ]
    );
}

#[test]
fn ignored_administrators_never_appear() {
    let mut roster = RosterSnapshot::new();
    roster.insert("Boss", MemberRecord::new("Deputy Owner", days_ago(5000), u64::MAX));
    roster.insert("Mod", MemberRecord::new("MODERATOR", days_ago(5000), u64::MAX));
    assert!(evaluate(&ThresholdLadder::osrs(), &roster, now()).is_empty());

    let mut roster = RosterSnapshot::new();
    roster.insert("Gen", MemberRecord::new("general", days_ago(5000), 0));
    roster.insert("Adm", MemberRecord::new("Admin", days_ago(5000), 0));
    assert!(evaluate(&BandedLadder::rs3(), &roster, now()).is_empty());
}

#[test]
fn snapshot_is_left_untouched() {
    let roster = single("Aria", MemberRecord::new("thief", days_ago(50), 60_000));
    let before = roster.clone();
    let _ = evaluate(&ThresholdLadder::osrs(), &roster, now());
    assert_eq!(roster, before);
}

#[test]
fn store_json_evaluates_like_typed_input() {
    let json = format!(
        r#"{{
            "Zed": {{"Clan Rank": "Recruit", "Join Date": "{}", "Total XP": 120000, "Kills": 3}},
            "amy": {{"Clan Rank": "thief", "Join Date": "{}", "Total XP": 55000}}
        }}"#,
        days_ago(60),
        days_ago(15)
    );
    let roster: RosterSnapshot = serde_json::from_str(&json).unwrap();
    let records = evaluate(&ThresholdLadder::osrs(), &roster, now());
    let summary: Vec<_> = records.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        summary,
        vec!["amy: thief -> recruit", "Zed: recruit -> corporal"]
    );
}

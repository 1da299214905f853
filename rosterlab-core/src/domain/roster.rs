//! Roster snapshot — member name → rank, join date, experience.
//!
//! The JSON shape is owned by the roster fetcher: keys are the display
//! labels `"Clan Rank"`, `"Join Date"` and `"Total XP"`, every one optional.
//! Unrecognized keys are carried through untouched so a store rewrite never
//! drops data it does not understand. A known key holding a value of the
//! wrong type is kept the same way, and the record reports it as malformed.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Sentinel stored when a member's join date has never been recorded.
pub const UNKNOWN_JOIN_DATE: &str = "Unknown";

/// Fixed join date format (`MM/DD/YYYY`).
pub const JOIN_DATE_FORMAT: &str = "%m/%d/%Y";

/// Store key for the member's rank.
pub const RANK_KEY: &str = "Clan Rank";

/// Store key for the member's join date.
pub const JOIN_DATE_KEY: &str = "Join Date";

/// Store key for the member's total experience.
pub const EXPERIENCE_KEY: &str = "Total XP";

/// One member's attributes as stored in the roster file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMemberRecord")]
pub struct MemberRecord {
    #[serde(rename = "Clan Rank", default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(rename = "Join Date", default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    #[serde(rename = "Total XP", default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<u64>,
    /// Fields this crate does not interpret (kill counts, notes, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MemberRecord {
    pub fn new(rank: impl Into<String>, join_date: impl Into<String>, experience: u64) -> Self {
        Self {
            rank: Some(rank.into()),
            join_date: Some(join_date.into()),
            experience: Some(experience),
            extra: BTreeMap::new(),
        }
    }

    /// Stored rank, or `default` when the record has none.
    pub fn rank_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.rank.as_deref().unwrap_or(default)
    }

    /// Stored join date string; absent dates read as [`UNKNOWN_JOIN_DATE`].
    pub fn join_date_str(&self) -> &str {
        self.join_date.as_deref().unwrap_or(UNKNOWN_JOIN_DATE)
    }

    /// Total experience; absent reads as zero.
    pub fn experience(&self) -> u64 {
        self.experience.unwrap_or(0)
    }

    pub fn has_known_join_date(&self) -> bool {
        self.join_date_str() != UNKNOWN_JOIN_DATE
    }

    /// `"Clan Rank"` is present but not a string.
    pub fn has_malformed_rank(&self) -> bool {
        self.rank.is_none() && self.extra.contains_key(RANK_KEY)
    }

    /// `"Join Date"` is present but not a string.
    pub fn has_malformed_join_date(&self) -> bool {
        self.join_date.is_none() && self.extra.contains_key(JOIN_DATE_KEY)
    }

    /// `"Total XP"` is present but not a non-negative integer.
    pub fn has_malformed_experience(&self) -> bool {
        self.experience.is_none() && self.extra.contains_key(EXPERIENCE_KEY)
    }

    pub fn set_rank(&mut self, rank: impl Into<String>) {
        self.extra.remove(RANK_KEY);
        self.rank = Some(rank.into());
    }

    pub fn set_join_date(&mut self, join_date: impl Into<String>) {
        self.extra.remove(JOIN_DATE_KEY);
        self.join_date = Some(join_date.into());
    }

    pub fn set_experience(&mut self, experience: u64) {
        self.extra.remove(EXPERIENCE_KEY);
        self.experience = Some(experience);
    }
}

/// Wire form of [`MemberRecord`] before the known keys are type-checked.
#[derive(Deserialize)]
struct RawMemberRecord {
    #[serde(rename = "Clan Rank", default)]
    rank: Option<serde_json::Value>,
    #[serde(rename = "Join Date", default)]
    join_date: Option<serde_json::Value>,
    #[serde(rename = "Total XP", default)]
    experience: Option<serde_json::Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl From<RawMemberRecord> for MemberRecord {
    fn from(raw: RawMemberRecord) -> Self {
        let mut extra = raw.extra;
        let mut stash = |key: &str, value: serde_json::Value| {
            extra.insert(key.to_string(), value);
        };

        let rank = match raw.rank {
            Some(serde_json::Value::String(rank)) => Some(rank),
            Some(other) => {
                stash(RANK_KEY, other);
                None
            }
            None => None,
        };
        let join_date = match raw.join_date {
            Some(serde_json::Value::String(date)) => Some(date),
            Some(other) => {
                stash(JOIN_DATE_KEY, other);
                None
            }
            None => None,
        };
        let experience = match raw.experience {
            Some(value) => match value.as_u64() {
                Some(xp) => Some(xp),
                None => {
                    stash(EXPERIENCE_KEY, value);
                    None
                }
            },
            None => None,
        };

        Self {
            rank,
            join_date,
            experience,
            extra,
        }
    }
}

/// Read-only roster snapshot keyed by member name.
///
/// A `BTreeMap` keeps serialization canonical, which the runner relies on
/// when hashing a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterSnapshot {
    members: BTreeMap<String, MemberRecord>,
}

impl RosterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, record: MemberRecord) -> Option<MemberRecord> {
        self.members.insert(name.into(), record)
    }

    pub fn get(&self, name: &str) -> Option<&MemberRecord> {
        self.members.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MemberRecord> {
        self.members.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<MemberRecord> {
        self.members.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MemberRecord)> {
        self.members.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<(String, MemberRecord)> for RosterSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, MemberRecord)>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

// ─── Join dates ──────────────────────────────────────────────────────

/// Parse a stored join date. Returns `None` for the `"Unknown"` sentinel
/// and for anything that does not match `MM/DD/YYYY` exactly, surrounding
/// whitespace included.
pub fn parse_join_date(raw: &str) -> Option<NaiveDate> {
    if raw == UNKNOWN_JOIN_DATE || raw.trim() != raw {
        return None;
    }
    NaiveDate::parse_from_str(raw, JOIN_DATE_FORMAT).ok()
}

/// Render a date in the stored `MM/DD/YYYY` form.
pub fn format_join_date(date: NaiveDate) -> String {
    date.format(JOIN_DATE_FORMAT).to_string()
}

/// Whole days a member has been in the clan at `now`.
///
/// Elapsed time is measured from midnight of the join date and floored, so
/// it equals the calendar-day difference. Future join dates give negative
/// tenure.
pub fn tenure_days(join_date: NaiveDate, now: NaiveDateTime) -> i64 {
    (now.date() - join_date).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn parse_join_date_accepts_fixed_format() {
        assert_eq!(
            parse_join_date("03/15/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn parse_join_date_rejects_sentinel_and_garbage() {
        assert_eq!(parse_join_date("Unknown"), None);
        assert_eq!(parse_join_date("2024-03-15"), None);
        assert_eq!(parse_join_date("13/40/2024"), None);
        assert_eq!(parse_join_date(""), None);
    }

    #[test]
    fn parse_join_date_rejects_surrounding_whitespace() {
        assert_eq!(parse_join_date(" 01/01/2024"), None);
        assert_eq!(parse_join_date("01/01/2024\n"), None);
        assert!(parse_join_date("01/01/2024").is_some());
    }

    #[test]
    fn format_join_date_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(format_join_date(date), "01/05/2023");
    }

    #[test]
    fn tenure_floors_partial_days() {
        let join = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(tenure_days(join, at(2024, 1, 1, 23)), 0);
        assert_eq!(tenure_days(join, at(2024, 1, 31, 0)), 30);
        assert_eq!(tenure_days(join, at(2024, 1, 31, 18)), 30);
    }

    #[test]
    fn tenure_negative_for_future_join() {
        let join = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(tenure_days(join, at(2024, 1, 1, 12)), -1);
    }

    #[test]
    fn record_defaults() {
        let record = MemberRecord::default();
        assert_eq!(record.rank_or("thief"), "thief");
        assert_eq!(record.join_date_str(), UNKNOWN_JOIN_DATE);
        assert_eq!(record.experience(), 0);
        assert!(!record.has_known_join_date());
    }

    #[test]
    fn snapshot_deserializes_store_shape() {
        let json = r#"{
            "Aria": {"Clan Rank": "thief", "Join Date": "01/02/2024", "Total XP": 60000},
            "Bo": {"Clan Rank": "Recruit", "Kills": 4}
        }"#;
        let snapshot: RosterSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.len(), 2);

        let aria = snapshot.get("Aria").unwrap();
        assert_eq!(aria.rank.as_deref(), Some("thief"));
        assert_eq!(aria.experience(), 60_000);

        let bo = snapshot.get("Bo").unwrap();
        assert_eq!(bo.join_date_str(), UNKNOWN_JOIN_DATE);
        assert_eq!(bo.extra.get("Kills"), Some(&serde_json::json!(4)));
    }

    #[test]
    fn snapshot_preserves_unknown_fields_on_rewrite() {
        let json = r#"{"Cy":{"Clan Rank":"Corporal","Join Date":"Unknown","Total XP":5,"Kills":9}}"#;
        let snapshot: RosterSnapshot = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(back["Cy"]["Kills"], serde_json::json!(9));
        assert_eq!(back["Cy"]["Join Date"], serde_json::json!("Unknown"));
    }

    #[test]
    fn wrongly_typed_fields_are_kept_and_flagged() {
        let json = r#"{
            "Bad": {"Clan Rank": 7, "Join Date": 20240101, "Total XP": -5, "Kills": 1},
            "Float": {"Clan Rank": "thief", "Join Date": "01/02/2024", "Total XP": 12.5},
            "Null": {"Clan Rank": null, "Join Date": null}
        }"#;
        let snapshot: RosterSnapshot = serde_json::from_str(json).unwrap();

        let bad = snapshot.get("Bad").unwrap();
        assert!(bad.has_malformed_rank());
        assert!(bad.has_malformed_join_date());
        assert!(bad.has_malformed_experience());
        assert_eq!(bad.join_date_str(), UNKNOWN_JOIN_DATE);

        let float = snapshot.get("Float").unwrap();
        assert!(!float.has_malformed_rank());
        assert!(float.has_malformed_experience());

        let null = snapshot.get("Null").unwrap();
        assert!(!null.has_malformed_rank());
        assert!(!null.has_malformed_join_date());

        let back = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(back["Bad"]["Join Date"], serde_json::json!(20240101));
        assert_eq!(back["Bad"]["Total XP"], serde_json::json!(-5));
        assert_eq!(back["Float"]["Total XP"], serde_json::json!(12.5));
    }

    #[test]
    fn setters_replace_a_malformed_value() {
        let mut record: MemberRecord =
            serde_json::from_str(r#"{"Join Date": 20240101}"#).unwrap();
        record.set_join_date("01/01/2024");
        assert!(!record.has_malformed_join_date());

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"Join Date":"01/01/2024"}"#);
    }
}

//! Roster import — merge a clan-members CSV export into the roster store.
//!
//! The export has a header row followed by `name,rank,xp,kills` rows. After
//! an import the store holds exactly the exported members: rank and
//! experience come from the export, join dates are kept from the store (new
//! members get `"Unknown"`), and members missing from the export are dropped.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rosterlab_core::domain::UNKNOWN_JOIN_DATE;
use rosterlab_core::evaluator::member_order;
use rosterlab_core::{MemberRecord, RosterSnapshot};

use crate::store::{RosterStore, StoreError};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("open export {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed export row: {0}")]
    Row(#[from] csv::Error),
    #[error("export contains no members; refusing to empty the roster")]
    EmptyExport,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One data row of the export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportRow {
    pub name: String,
    pub rank: String,
    pub experience: u64,
    pub kills: u64,
}

/// What an import changed. Name lists are sorted case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub added: Vec<String>,
    /// Existing members whose rank or experience changed.
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

/// Parse every data row; the first malformed row fails the whole export.
///
/// The clan members export is Latin-1, so fields that are not valid UTF-8
/// are decoded byte by byte. Non-breaking spaces become plain spaces.
pub fn parse_export<R: io::Read>(reader: R) -> Result<Vec<ExportRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let fields: csv::StringRecord = record.iter().map(decode_field).collect();
        let row: ExportRow = fields.deserialize(None)?;
        rows.push(row);
    }
    Ok(rows)
}

fn decode_field(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    };
    text.replace('\u{a0}', " ").trim().to_string()
}

/// Merge exported rows into `existing`, returning the new roster and a summary.
pub fn merge(existing: &RosterSnapshot, rows: &[ExportRow]) -> (RosterSnapshot, ImportSummary) {
    let mut merged = RosterSnapshot::new();
    let mut summary = ImportSummary::default();

    for row in rows {
        if merged.contains(&row.name) {
            tracing::warn!(member = %row.name, "duplicate member in export, keeping the later row");
        }
        let record = match existing.get(&row.name) {
            Some(previous) => {
                let changed = previous.rank.as_deref() != Some(row.rank.as_str())
                    || previous.experience != Some(row.experience);
                if changed && !summary.updated.contains(&row.name) {
                    summary.updated.push(row.name.clone());
                }
                let mut record = previous.clone();
                record.set_rank(row.rank.clone());
                record.set_experience(row.experience);
                record
            }
            None => {
                if !summary.added.contains(&row.name) {
                    summary.added.push(row.name.clone());
                }
                MemberRecord::new(row.rank.clone(), UNKNOWN_JOIN_DATE, row.experience)
            }
        };
        merged.insert(row.name.clone(), record);
    }

    summary.removed = existing
        .names()
        .filter(|name| !merged.contains(name))
        .map(str::to_string)
        .collect();

    for list in [&mut summary.added, &mut summary.updated, &mut summary.removed] {
        list.sort_by(|a, b| member_order(a, b));
    }
    (merged, summary)
}

/// Merge an export read from `reader` into `store`.
///
/// A store that does not exist yet is treated as empty. Nothing is written
/// when the export fails to parse.
pub fn import_members<R: io::Read>(
    store: &RosterStore,
    reader: R,
) -> Result<ImportSummary, ImportError> {
    let rows = parse_export(reader)?;
    if rows.is_empty() {
        return Err(ImportError::EmptyExport);
    }

    let existing = match store.load() {
        Ok(roster) => roster,
        Err(StoreError::DataUnavailable { .. }) => RosterSnapshot::new(),
        Err(e) => return Err(e.into()),
    };

    let (merged, summary) = merge(&existing, &rows);
    store.save(&merged)?;
    tracing::info!(
        path = %store.path().display(),
        members = merged.len(),
        added = summary.added.len(),
        updated = summary.updated.len(),
        removed = summary.removed.len(),
        "roster imported"
    );
    Ok(summary)
}

/// Merge the export file at `path` into `store`.
pub fn import_file(store: &RosterStore, path: &Path) -> Result<ImportSummary, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    import_members(store, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "Clanmate, Clan Rank, Total XP, Kills\n\
                          Aria,Corporal,200000,4\n\
                          Bo, Recruit , 55000 , 0\n";

    #[test]
    fn parses_rows_skipping_header() {
        let rows = parse_export(EXPORT.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                ExportRow {
                    name: "Aria".into(),
                    rank: "Corporal".into(),
                    experience: 200_000,
                    kills: 4
                },
                ExportRow {
                    name: "Bo".into(),
                    rank: "Recruit".into(),
                    experience: 55_000,
                    kills: 0
                },
            ]
        );
    }

    #[test]
    fn latin1_names_decode_with_plain_spaces() {
        let export: &[u8] = b"Clanmate, Clan Rank, Total XP, Kills\n\
                              Foo\xa0Bar,Recruit,100,0\n\
                              Zo\xeb,Recruit,5,1\n";
        let rows = parse_export(export).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Foo Bar", "Zo\u{eb}"]);
    }

    #[test]
    fn utf8_names_pass_through() {
        let export = "Clanmate,Clan Rank,Total XP,Kills\nZo\u{eb} Ray,Recruit,5,1\n";
        let rows = parse_export(export.as_bytes()).unwrap();
        assert_eq!(rows[0].name, "Zo\u{eb} Ray");
    }

    #[test]
    fn latin1_export_imports_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("roster.json"));
        let export: &[u8] = b"Clanmate, Clan Rank, Total XP, Kills\nFoo\xa0Bar,Recruit,100,0\n";
        let summary = import_members(&store, export).unwrap();
        assert_eq!(summary.added, vec!["Foo Bar"]);
        assert_eq!(store.join_date("Foo Bar").unwrap(), UNKNOWN_JOIN_DATE);
    }

    #[test]
    fn merge_replaces_wrongly_typed_rank_and_experience() {
        let mut existing = RosterSnapshot::new();
        let previous: MemberRecord = serde_json::from_str(
            r#"{"Clan Rank": 4, "Join Date": "05/06/2023", "Total XP": -1}"#,
        )
        .unwrap();
        existing.insert("Aria", previous);

        let rows = parse_export(EXPORT.as_bytes()).unwrap();
        let (merged, _) = merge(&existing, &rows);
        let json = serde_json::to_value(merged.get("Aria").unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Clan Rank": "Corporal", "Join Date": "05/06/2023", "Total XP": 200000})
        );
    }

    #[test]
    fn malformed_row_fails() {
        let bad = "name,rank,xp,kills\nAria,Corporal,lots,4\n";
        assert!(matches!(parse_export(bad.as_bytes()), Err(ImportError::Row(_))));
        let short = "name,rank,xp,kills\nAria,Corporal\n";
        assert!(matches!(parse_export(short.as_bytes()), Err(ImportError::Row(_))));
    }

    #[test]
    fn merge_keeps_join_dates_and_drops_departed() {
        let mut existing = RosterSnapshot::new();
        existing.insert("Aria", MemberRecord::new("Recruit", "05/06/2023", 100_000));
        existing.insert("Gone", MemberRecord::new("Recruit", "01/01/2020", 1));

        let rows = parse_export(EXPORT.as_bytes()).unwrap();
        let (merged, summary) = merge(&existing, &rows);

        let aria = merged.get("Aria").unwrap();
        assert_eq!(aria.rank.as_deref(), Some("Corporal"));
        assert_eq!(aria.join_date_str(), "05/06/2023");
        assert_eq!(aria.experience(), 200_000);
        assert_eq!(merged.get("Bo").unwrap().join_date_str(), UNKNOWN_JOIN_DATE);
        assert!(!merged.contains("Gone"));

        assert_eq!(
            summary,
            ImportSummary {
                added: vec!["Bo".into()],
                updated: vec!["Aria".into()],
                removed: vec!["Gone".into()],
            }
        );
    }

    #[test]
    fn unchanged_member_is_not_reported_as_updated() {
        let mut existing = RosterSnapshot::new();
        existing.insert("Bo", MemberRecord::new("Recruit", "05/06/2023", 55_000));
        let rows = parse_export(EXPORT.as_bytes()).unwrap();
        let (_, summary) = merge(&existing, &rows);
        assert!(summary.updated.is_empty());
        assert_eq!(summary.added, vec!["Aria"]);
    }

    #[test]
    fn empty_export_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("roster.json"));
        let result = import_members(&store, "name,rank,xp,kills\n".as_bytes());
        assert!(matches!(result, Err(ImportError::EmptyExport)));
        assert!(!store.exists());
    }
}

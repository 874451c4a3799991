//! Reading entry snapshots exported from the hosted entry table.
//!
//! A snapshot is either a JSON array of entry objects, as returned by the
//! store's REST API, or a CSV export of the table with the header
//! `id,amount,category,type,createdAt`. Rows are decoded one at a time so a
//! single bad row does not prevent the rest from being summarized.

use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;
use serde_json::Value;

use crate::{EntryId, Error, RawEntry, parse_timestamp};

/// The decoded rows of a snapshot.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    /// Every row that could be decoded, in file order.
    pub entries: Vec<RawEntry>,
    /// The number of rows that could not be decoded, e.g. because the
    /// timestamp was unreadable.
    pub rejected_rows: usize,
}

/// A row of a CSV export. Everything is read as text and checked later.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    entry_type: Option<String>,
    #[serde(rename = "createdAt", alias = "created_at")]
    created_at: String,
}

impl CsvRow {
    fn into_raw_entry(self) -> Result<RawEntry, Error> {
        Ok(RawEntry {
            id: EntryId::new(&self.id),
            amount: self.amount.map(Value::String),
            category: self.category,
            entry_type: self.entry_type,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Reads a snapshot from `path`, choosing the format from the file extension.
///
/// # Errors
/// Returns [Error::UnsupportedSnapshotFormat] if the extension is not `json`
/// or `csv`, [Error::Io] if the file cannot be opened and
/// [Error::InvalidSnapshot] if the file as a whole cannot be read.
pub fn load_path(path: &Path) -> Result<Snapshot, Error> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => load_json(File::open(path)?),
        "csv" => load_csv(File::open(path)?),
        _ => Err(Error::UnsupportedSnapshotFormat(path.display().to_string())),
    }
}

/// Reads a snapshot from a JSON array of entry objects.
///
/// # Errors
/// Returns [Error::InvalidSnapshot] if the document is not a JSON array.
pub fn load_json<R: Read>(reader: R) -> Result<Snapshot, Error> {
    let rows: Vec<Value> =
        serde_json::from_reader(reader).map_err(|error| Error::InvalidSnapshot(error.to_string()))?;

    let mut snapshot = Snapshot::default();

    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<RawEntry>(row) {
            Ok(entry) => snapshot.entries.push(entry),
            Err(error) => {
                tracing::debug!("Skipping JSON row {index}: {error}");
                snapshot.rejected_rows += 1;
            }
        }
    }

    log_rejected_rows(&snapshot);

    Ok(snapshot)
}

/// Reads a snapshot from CSV with a header row.
///
/// # Errors
/// Returns [Error::InvalidSnapshot] if the header row cannot be read.
pub fn load_csv<R: Read>(reader: R) -> Result<Snapshot, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidSnapshot(error.to_string()))?
        .clone();

    let mut snapshot = Snapshot::default();

    for (index, record) in reader.records().enumerate() {
        let entry = record
            .map_err(|error| Error::InvalidSnapshot(error.to_string()))
            .and_then(|record| {
                record
                    .deserialize::<CsvRow>(Some(&headers))
                    .map_err(|error| Error::InvalidSnapshot(error.to_string()))
            })
            .and_then(CsvRow::into_raw_entry);

        match entry {
            Ok(entry) => snapshot.entries.push(entry),
            Err(error) => {
                // Row 1 is the header.
                tracing::debug!("Skipping CSV row {}: {error}", index + 2);
                snapshot.rejected_rows += 1;
            }
        }
    }

    log_rejected_rows(&snapshot);

    Ok(snapshot)
}

fn log_rejected_rows(snapshot: &Snapshot) {
    if snapshot.rejected_rows > 0 {
        tracing::warn!(
            "Skipped {} unreadable rows, kept {}",
            snapshot.rejected_rows,
            snapshot.entries.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rust_decimal::Decimal;
    use serde_json::json;
    use time::macros::datetime;

    use super::{load_csv, load_json, load_path};
    use crate::{EntryId, EntryType, Error};

    #[test]
    fn load_json_reads_rows() {
        let text = r#"[
            {"id": 1, "amount": 500, "category": "food", "type": "expense", "createdAt": "2025-03-05T00:00:00+00:00"},
            {"id": 2, "amount": 2000, "category": "salary", "type": "income", "createdAt": "2025-03-01T00:00:00Z", "user_id": "u1"}
        ]"#;

        let snapshot = load_json(text.as_bytes()).unwrap();

        assert_eq!(snapshot.rejected_rows, 0);
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.entries[1].id, EntryId::new("2"));
        assert_eq!(snapshot.entries[1].amount, Some(json!(2000)));
    }

    #[test]
    fn load_json_skips_undecodable_rows() {
        let text = r#"[
            {"id": 1, "amount": 500, "type": "expense", "createdAt": "not a date"},
            {"amount": 500, "type": "expense", "createdAt": "2025-03-05T00:00:00Z"},
            {"id": 3, "amount": "oops", "type": "expense", "createdAt": "2025-03-05T00:00:00Z"}
        ]"#;

        let snapshot = load_json(text.as_bytes()).unwrap();

        // The third row decodes, its amount is reported later during validation.
        assert_eq!(snapshot.rejected_rows, 2);
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].id, EntryId::new("3"));
    }

    #[test]
    fn load_json_rejects_non_array_document() {
        let result = load_json(r#"{"error": "Failed to fetch"}"#.as_bytes());

        assert!(matches!(result, Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn load_csv_reads_rows() {
        let text = "\
id,amount,category,type,createdAt
1,500,food,expense,2025-03-05T00:00:00Z
2,300,,payment,2025-03-20 08:15:00
";

        let snapshot = load_csv(text.as_bytes()).unwrap();

        assert_eq!(snapshot.rejected_rows, 0);
        assert_eq!(snapshot.entries.len(), 2);

        let second = snapshot.entries[1].validate().unwrap();
        assert_eq!(second.amount, Decimal::from(300));
        assert_eq!(second.category, None);
        assert_eq!(second.entry_type, EntryType::Expense);
        assert_eq!(second.created_at, datetime!(2025-03-20 08:15 UTC));
    }

    #[test]
    fn load_csv_skips_bad_rows_and_keeps_the_rest() {
        let text = "\
id,amount,category,type,createdAt
1,500,food,expense,someday
2,300,food,expense
3,100,food,expense,2025-03-05
";

        let snapshot = load_csv(text.as_bytes()).unwrap();

        assert_eq!(snapshot.rejected_rows, 2);
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.entries[0].id, EntryId::new("3"));
    }

    #[test]
    fn load_csv_handles_empty_input() {
        let snapshot = load_csv("".as_bytes()).unwrap();

        assert!(snapshot.entries.is_empty());
        assert_eq!(snapshot.rejected_rows, 0);
    }

    #[test]
    fn load_path_rejects_unknown_extension() {
        let result = load_path(Path::new("entries.xlsx"));

        assert_eq!(
            result,
            Err(Error::UnsupportedSnapshotFormat("entries.xlsx".to_owned()))
        );
    }
}

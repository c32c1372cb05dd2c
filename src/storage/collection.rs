//! Reading and writing record collections
//!
//! A collection is the full ordered set of records of one type in a CSV data
//! file. Reads validate the header row and parse every row strictly; a single
//! bad row fails the whole read so partial collections are never returned.
//! Writes truncate in place under the advisory lock and preserve caller
//! order.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::error::{OutlayError, OutlayResult};
use crate::models::RowRecord;

use super::lock::{LockStatus, LockedFile};

/// Result of reading a collection
#[derive(Debug)]
pub struct ReadOutcome<R> {
    /// Records in on-disk order
    pub records: Vec<R>,
    pub lock: LockStatus,
}

/// Read all records from a data file
///
/// A non-existent path yields an empty collection, not an error.
pub fn read_collection<R: RowRecord>(path: &Path) -> OutlayResult<ReadOutcome<R>> {
    if !path.exists() {
        return Ok(ReadOutcome {
            records: Vec::new(),
            lock: LockStatus::Acquired,
        });
    }

    let file = File::open(path)
        .map_err(|e| OutlayError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let locked = LockedFile::exclusive(file);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(locked.file());

    let headers = reader
        .headers()
        .map_err(|e| OutlayError::Csv(format!("Failed to read {}: {}", path.display(), e)))?
        .clone();
    validate_headers::<R>(path, &headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| OutlayError::Csv(format!("Failed to read {}: {}", path.display(), e)))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let parsed = R::from_row(&row).map_err(|e| OutlayError::RecordParse {
            path: path.to_path_buf(),
            row: line,
            reason: e.to_string(),
        })?;
        records.push(parsed);
    }

    Ok(ReadOutcome {
        records,
        lock: locked.status(),
    })
}

/// Write a full collection, replacing the file contents
///
/// The caller supplies record order; this layer preserves it. Returns whether
/// the write ran under the advisory lock.
pub fn write_collection<R: RowRecord>(path: &Path, records: &[R]) -> OutlayResult<LockStatus> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            OutlayError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .map_err(|e| OutlayError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let locked = LockedFile::exclusive(file);

    // Truncate only once the lock (if obtainable) is held.
    locked
        .file()
        .set_len(0)
        .map_err(|e| OutlayError::Io(format!("Failed to truncate {}: {}", path.display(), e)))?;

    let mut writer = csv::Writer::from_writer(locked.file());
    writer
        .write_record(R::headers())
        .map_err(|e| OutlayError::Csv(format!("Failed to write {}: {}", path.display(), e)))?;
    for record in records {
        let row = record.to_row();
        writer
            .write_record(row.iter().map(|(_, value)| value.as_str()))
            .map_err(|e| OutlayError::Csv(format!("Failed to write {}: {}", path.display(), e)))?;
    }
    writer
        .flush()
        .map_err(|e| OutlayError::Io(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(locked.status())
}

fn validate_headers<R: RowRecord>(path: &Path, headers: &csv::StringRecord) -> OutlayResult<()> {
    let present: Vec<&str> = headers.iter().collect();
    let missing: Vec<&str> = R::required_columns()
        .iter()
        .filter(|required| !present.contains(required))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(OutlayError::missing_columns(path, &missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::ItemRatings;
    use crate::models::{ItemRecord, MoneyRecord};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn item(product: &str, cost: f64) -> ItemRecord {
        ItemRecord::new(
            NaiveDate::from_ymd_opt(2026, 3, 10)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap(),
            product,
            "",
            "online",
            "",
            cost,
            ItemRatings::default(),
            "",
            "none",
        )
    }

    #[test]
    fn test_missing_path_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let outcome: ReadOutcome<ItemRecord> =
            read_collection(&temp_dir.path().join("items.csv")).unwrap();
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_write_then_read_round_trip_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.csv");

        let items = vec![item("Desk", 250.0), item("Lamp", 35.5), item("Chair", 120.0)];
        let lock = write_collection(&path, &items).unwrap();
        assert!(lock.is_acquired());

        let outcome: ReadOutcome<ItemRecord> = read_collection(&path).unwrap();
        assert_eq!(outcome.records, items);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data").join("items.csv");

        write_collection(&path, &[item("Desk", 250.0)]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("money.csv");
        std::fs::write(&path, "id,date,entry_type\n").unwrap();

        let err = read_collection::<MoneyRecord>(&path).unwrap_err();
        match err {
            OutlayError::Schema { columns, .. } => {
                assert!(columns.contains("amount"));
                assert!(columns.contains("linked_item_id"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_row_fails_whole_read_with_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.csv");

        let items = vec![item("Desk", 250.0), item("Lamp", 35.5)];
        write_collection(&path, &items).unwrap();

        // Corrupt the row dates in place.
        let contents = std::fs::read_to_string(&path).unwrap();
        let corrupted = contents.replace("2026-03-10 08:15", "soon");
        std::fs::write(&path, corrupted).unwrap();

        let err = read_collection::<ItemRecord>(&path).unwrap_err();
        match err {
            OutlayError::RecordParse { row, reason, .. } => {
                // Header is line 1; the first corrupted row is line 2.
                assert_eq!(row, 2);
                assert!(reason.contains("date"));
            }
            other => panic!("expected record parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_legacy_file_without_want_column() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.csv");
        std::fs::write(
            &path,
            "id,date,product,description,location,reference,cost,urgency,value,price_comp,effect,justification,recurrence,overall_score\n\
             a1,2025-12-01 10:00,Kettle,,home,,35.00,2,3,3,2,,none,\n",
        )
        .unwrap();

        let outcome: ReadOutcome<ItemRecord> = read_collection(&path).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].want, 3);
        assert_eq!(outcome.records[0].overall_score, None);
    }

    #[test]
    fn test_fields_with_commas_and_quotes_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.csv");

        let mut quoted = item("Monitor, 27\"", 310.0);
        quoted.description = "ultrawide\n\"open box\"".to_string();
        write_collection(&path, &[quoted.clone()]).unwrap();

        let outcome: ReadOutcome<ItemRecord> = read_collection(&path).unwrap();
        assert_eq!(outcome.records, vec![quoted]);
    }
}

//! Whole-dataset export/import
//!
//! A bundle is a single JSON document holding both collections plus metadata,
//! used to move or archive the full dataset in one file. Row values are the
//! same strings the CSV files store, so a bundle round-trips exactly. The
//! read path applies the same strict per-record parsing as the collection
//! reader and fails atomically on any bad record.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{OutlayError, OutlayResult};
use crate::models::{ItemRecord, MoneyRecord, RowRecord};

use super::lock::{LockStatus, LockedFile};

/// Current bundle schema version
pub const BUNDLE_VERSION: u32 = 1;

/// Bundle document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMetadata {
    #[serde(default = "default_version")]
    pub version: u32,
    /// ISO-8601 UTC generation timestamp
    #[serde(default)]
    pub generated_at: String,
}

fn default_version() -> u32 {
    BUNDLE_VERSION
}

impl Default for BundleMetadata {
    fn default() -> Self {
        Self {
            version: BUNDLE_VERSION,
            generated_at: String::new(),
        }
    }
}

/// Both collections plus metadata, as read from a bundle file
#[derive(Debug, Default)]
pub struct Bundle {
    pub metadata: BundleMetadata,
    pub items: Vec<ItemRecord>,
    pub money: Vec<MoneyRecord>,
}

/// Result of reading a bundle
#[derive(Debug)]
pub struct BundleOutcome {
    pub bundle: Bundle,
    pub lock: LockStatus,
}

/// Write both collections into one bundle document
pub fn write_bundle(
    path: &Path,
    items: &[ItemRecord],
    money: &[MoneyRecord],
) -> OutlayResult<LockStatus> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            OutlayError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let payload = json!({
        "metadata": {
            "version": BUNDLE_VERSION,
            "generated_at": Utc::now().to_rfc3339(),
        },
        "items": items.iter().map(row_object).collect::<Vec<_>>(),
        "money": money.iter().map(row_object).collect::<Vec<_>>(),
    });

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .map_err(|e| OutlayError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let locked = LockedFile::exclusive(file);

    locked
        .file()
        .set_len(0)
        .map_err(|e| OutlayError::Io(format!("Failed to truncate {}: {}", path.display(), e)))?;
    serde_json::to_writer_pretty(locked.file(), &payload)
        .map_err(|e| OutlayError::Json(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(locked.status())
}

/// Read a bundle document
///
/// A non-existent path yields an empty bundle.
pub fn read_bundle(path: &Path) -> OutlayResult<BundleOutcome> {
    if !path.exists() {
        return Ok(BundleOutcome {
            bundle: Bundle::default(),
            lock: LockStatus::Acquired,
        });
    }

    let file = File::open(path)
        .map_err(|e| OutlayError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let locked = LockedFile::exclusive(file);

    let document: Value = serde_json::from_reader(locked.file())
        .map_err(|e| OutlayError::Json(format!("Failed to parse {}: {}", path.display(), e)))?;

    let metadata = match document.get("metadata") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| OutlayError::Json(format!("Failed to parse {}: {}", path.display(), e)))?,
        None => BundleMetadata::default(),
    };

    let items = parse_rows::<ItemRecord>(path, document.get("items"))?;
    let money = parse_rows::<MoneyRecord>(path, document.get("money"))?;

    Ok(BundleOutcome {
        bundle: Bundle {
            metadata,
            items,
            money,
        },
        lock: locked.status(),
    })
}

fn row_object<R: RowRecord>(record: &R) -> Value {
    let mut object = Map::new();
    for (column, value) in record.to_row() {
        object.insert(column.to_string(), Value::String(value));
    }
    Value::Object(object)
}

fn parse_rows<R: RowRecord>(path: &Path, section: Option<&Value>) -> OutlayResult<Vec<R>> {
    let entries = match section.and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let row = entry
            .as_object()
            .map(object_to_row)
            .transpose()?
            .ok_or_else(|| OutlayError::RecordParse {
                path: path.to_path_buf(),
                row: index as u64 + 1,
                reason: format!("{}: expected an object", R::KIND),
            })?;

        let record = R::from_row(&row).map_err(|e| OutlayError::RecordParse {
            path: path.to_path_buf(),
            row: index as u64 + 1,
            reason: format!("{}: {}", R::KIND, e),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn object_to_row(object: &Map<String, Value>) -> OutlayResult<HashMap<String, String>> {
    let mut row = HashMap::with_capacity(object.len());
    for (key, value) in object {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => {
                return Err(OutlayError::Json(format!(
                    "unsupported value for field '{}': {}",
                    key, other
                )))
            }
        };
        row.insert(key.clone(), text);
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::ItemRatings;
    use chrono::{DateTime, NaiveDate};
    use tempfile::TempDir;

    fn sample_records() -> (Vec<ItemRecord>, Vec<MoneyRecord>) {
        let date = NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(18, 45, 0)
            .unwrap();
        let item = ItemRecord::new(
            date,
            "Router",
            "wifi 7",
            "online",
            "",
            189.99,
            ItemRatings::default(),
            "old one drops connection",
            "none",
        );
        let entry = MoneyRecord::new(
            date,
            "expense",
            "ISP shop",
            189.99,
            "",
            Some(item.id.clone()),
        );
        (vec![item], vec![entry])
    }

    #[test]
    fn test_bundle_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.json");
        let (items, money) = sample_records();

        write_bundle(&path, &items, &money).unwrap();
        let outcome = read_bundle(&path).unwrap();

        assert_eq!(outcome.bundle.items, items);
        assert_eq!(outcome.bundle.money, money);
        assert_eq!(outcome.bundle.metadata.version, BUNDLE_VERSION);
    }

    #[test]
    fn test_generated_at_is_rfc3339_utc() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.json");
        let (items, money) = sample_records();

        write_bundle(&path, &items, &money).unwrap();
        let outcome = read_bundle(&path).unwrap();

        let parsed = DateTime::parse_from_rfc3339(&outcome.bundle.metadata.generated_at).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_missing_path_reads_empty_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let outcome = read_bundle(&temp_dir.path().join("missing.json")).unwrap();
        assert!(outcome.bundle.items.is_empty());
        assert!(outcome.bundle.money.is_empty());
    }

    #[test]
    fn test_bad_record_fails_whole_import() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.json");
        let (items, money) = sample_records();
        write_bundle(&path, &items, &money).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let corrupted = contents.replace("189.99", "plenty");
        std::fs::write(&path, corrupted).unwrap();

        let err = read_bundle(&path).unwrap_err();
        match err {
            OutlayError::RecordParse { row, reason, .. } => {
                assert_eq!(row, 1);
                assert!(reason.contains("cost"));
            }
            other => panic!("expected record parse error, got {other:?}"),
        }
    }
}

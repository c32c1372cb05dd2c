//! Seeding and defaulting for config documents
//!
//! Every config document follows the same lifecycle: if the file is absent it
//! is seeded from a packaged default payload (copied verbatim) or from the
//! in-memory default; after loading, missing keys are filled from the default
//! document without overwriting anything the user set, so older or hand-edited
//! files stay forward-compatible.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{OutlayError, OutlayResult};

/// Load a JSON document, seeding the file first if it does not exist
pub fn load_or_seed_json(
    path: &Path,
    packaged: Option<&Path>,
    default: &Value,
) -> OutlayResult<Value> {
    if !path.exists() {
        seed_file(path, packaged, || {
            serde_json::to_string_pretty(default).map_err(|e| {
                OutlayError::Json(format!("Failed to serialize default config: {}", e))
            })
        })?;
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| OutlayError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| OutlayError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load a text document, seeding the file first if it does not exist
///
/// Returns the contents and whether the file had to be created.
pub fn load_or_seed_text(
    path: &Path,
    packaged: Option<&Path>,
    default_contents: &str,
) -> OutlayResult<(String, bool)> {
    let mut created = false;
    if !path.exists() {
        seed_file(path, packaged, || Ok(default_contents.to_string()))?;
        created = true;
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| OutlayError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok((contents, created))
}

fn seed_file(
    path: &Path,
    packaged: Option<&Path>,
    default_contents: impl FnOnce() -> OutlayResult<String>,
) -> OutlayResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            OutlayError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    if let Some(packaged) = packaged {
        if packaged.exists() {
            fs::copy(packaged, path).map_err(|e| {
                OutlayError::Io(format!(
                    "Failed to copy packaged default {}: {}",
                    packaged.display(),
                    e
                ))
            })?;
            return Ok(());
        }
    }

    fs::write(path, default_contents()?)
        .map_err(|e| OutlayError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

/// Fill missing keys in `document` from `defaults` without overwriting
/// present ones (recursive setdefault). Returns whether anything changed.
pub fn merge_defaults(document: &mut Value, defaults: &Value) -> bool {
    let (Value::Object(document), Value::Object(defaults)) = (document, defaults) else {
        return false;
    };

    let mut changed = false;
    for (key, default_value) in defaults {
        match document.get_mut(key) {
            None => {
                document.insert(key.clone(), default_value.clone());
                changed = true;
            }
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    changed |= merge_defaults(existing, default_value);
                }
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_seeds_from_default_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("settings.json");
        let default = json!({"a": 1});

        let loaded = load_or_seed_json(&path, None, &default).unwrap();
        assert_eq!(loaded, default);
        assert!(path.exists());
    }

    #[test]
    fn test_seeds_from_packaged_copy_first() {
        let temp_dir = TempDir::new().unwrap();
        let packaged = temp_dir.path().join("packaged.json");
        fs::write(&packaged, r#"{"a": 99}"#).unwrap();
        let path = temp_dir.path().join("settings.json");

        let loaded = load_or_seed_json(&path, Some(&packaged), &json!({"a": 1})).unwrap();
        assert_eq!(loaded, json!({"a": 99}));
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"a": 7}"#).unwrap();

        let loaded = load_or_seed_json(&path, None, &json!({"a": 1})).unwrap();
        assert_eq!(loaded, json!({"a": 7}));
    }

    #[test]
    fn test_load_or_seed_text_reports_creation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("weights.txt");

        let (contents, created) = load_or_seed_text(&path, None, "key=1\n").unwrap();
        assert!(created);
        assert_eq!(contents, "key=1\n");

        let (_, created) = load_or_seed_text(&path, None, "key=1\n").unwrap();
        assert!(!created);
    }

    #[test]
    fn test_merge_defaults_fills_missing_nested_keys() {
        let mut document = json!({"backup": {"keep_recent": 5}, "ui": {"autosave": false}});
        let defaults = json!({
            "backup": {"keep_recent": 3, "keep_historical": 3},
            "ui": {"autosave": true, "currency_symbol": "$"},
        });

        let changed = merge_defaults(&mut document, &defaults);
        assert!(changed);
        // Present values untouched, missing ones filled.
        assert_eq!(document["backup"]["keep_recent"], 5);
        assert_eq!(document["backup"]["keep_historical"], 3);
        assert_eq!(document["ui"]["autosave"], false);
        assert_eq!(document["ui"]["currency_symbol"], "$");
    }

    #[test]
    fn test_merge_defaults_is_idempotent() {
        let defaults = json!({"a": {"b": 1}, "c": 2});
        let mut document = defaults.clone();
        assert!(!merge_defaults(&mut document, &defaults));
        assert_eq!(document, defaults);
    }
}

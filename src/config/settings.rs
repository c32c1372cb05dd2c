//! User settings for outlay-cli
//!
//! The settings document carries the data file locations, the backup
//! retention policy, the default theme name and UI preferences. Loading
//! repairs missing keys from the defaults and persists the repaired document
//! back to disk, so files written by older versions keep working.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{OutlayError, OutlayResult};

use super::loader::{load_or_seed_json, merge_defaults};
use super::paths::{is_unset, OutlayPaths};

/// Locations of the data files and the snapshot directory
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataPaths {
    #[serde(default)]
    pub items_csv: PathBuf,
    #[serde(default)]
    pub money_csv: PathBuf,
    #[serde(default)]
    pub backup_dir: PathBuf,
}

/// Snapshot retention policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPolicy {
    /// Newest snapshots always kept
    #[serde(default = "default_keep")]
    pub keep_recent: usize,
    /// Older snapshots kept as a stratified sample
    #[serde(default = "default_keep")]
    pub keep_historical: usize,
}

fn default_keep() -> usize {
    3
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self {
            keep_recent: 3,
            keep_historical: 3,
        }
    }
}

/// Theme selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSelection {
    #[serde(default = "default_theme")]
    pub default: String,
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for ThemeSelection {
    fn default() -> Self {
        Self {
            default: default_theme(),
        }
    }
}

/// Presentation preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// strftime format used when displaying dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
    /// Snapshot the data file after every save
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_autosave() -> bool {
    true
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            currency_symbol: default_currency(),
            autosave: default_autosave(),
        }
    }
}

/// User settings for outlay-cli
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub paths: DataPaths,
    #[serde(default)]
    pub backup: BackupPolicy,
    #[serde(default)]
    pub themes: ThemeSelection,
    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    /// The fully-populated default settings for a given path layout
    pub fn defaults(paths: &OutlayPaths) -> Self {
        Self {
            paths: DataPaths {
                items_csv: paths.items_file(),
                money_csv: paths.money_file(),
                backup_dir: paths.backup_dir(),
            },
            backup: BackupPolicy::default(),
            themes: ThemeSelection::default(),
            ui: UiSettings::default(),
        }
    }

    /// Load settings, seeding and repairing the document as needed
    ///
    /// Missing keys are filled from the defaults (present keys are never
    /// overwritten) and empty path strings are replaced with the computed
    /// defaults; if anything changed, the repaired document is written back.
    pub fn load_or_create(paths: &OutlayPaths) -> OutlayResult<Self> {
        let defaults = Self::defaults(paths);
        let default_doc = serde_json::to_value(&defaults)
            .map_err(|e| OutlayError::Json(format!("Failed to serialize defaults: {}", e)))?;

        let packaged = paths.bundled_file("settings.json");
        let mut document =
            load_or_seed_json(&paths.settings_file(), packaged.as_deref(), &default_doc)?;

        let mut changed = merge_defaults(&mut document, &default_doc);

        let mut settings: Settings = serde_json::from_value(document).map_err(|e| {
            OutlayError::Config(format!(
                "Failed to parse {}: {}",
                paths.settings_file().display(),
                e
            ))
        })?;
        changed |= settings.fill_unset_paths(paths);

        if changed {
            settings.save(paths)?;
        }
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &OutlayPaths) -> OutlayResult<()> {
        let settings_path = paths.settings_file();
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutlayError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| OutlayError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&settings_path, contents).map_err(|e| {
            OutlayError::Io(format!(
                "Failed to write {}: {}",
                settings_path.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn fill_unset_paths(&mut self, paths: &OutlayPaths) -> bool {
        let mut changed = false;
        if is_unset(&self.paths.items_csv) {
            self.paths.items_csv = paths.items_file();
            changed = true;
        }
        if is_unset(&self.paths.money_csv) {
            self.paths.money_csv = paths.money_file();
            changed = true;
        }
        if is_unset(&self.paths.backup_dir) {
            self.paths.backup_dir = paths.backup_dir();
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, OutlayPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    #[test]
    fn test_defaults_point_into_base_dir() {
        let (_temp, paths) = test_paths();
        let settings = Settings::defaults(&paths);

        assert_eq!(settings.paths.items_csv, paths.items_file());
        assert_eq!(settings.paths.backup_dir, paths.backup_dir());
        assert_eq!(settings.backup.keep_recent, 3);
        assert_eq!(settings.backup.keep_historical, 3);
        assert_eq!(settings.themes.default, "light");
        assert!(settings.ui.autosave);
    }

    #[test]
    fn test_first_load_seeds_document() {
        let (_temp, paths) = test_paths();
        let settings = Settings::load_or_create(&paths).unwrap();

        assert!(paths.settings_file().exists());
        assert_eq!(settings.ui.currency_symbol, "$");
    }

    #[test]
    fn test_missing_key_is_repaired_and_persisted() {
        let (_temp, paths) = test_paths();
        std::fs::create_dir_all(paths.config_dir()).unwrap();
        // Hand-edited document with no keep_historical and no ui section.
        std::fs::write(
            paths.settings_file(),
            r#"{"backup": {"keep_recent": 5}, "themes": {"default": "dark"}}"#,
        )
        .unwrap();

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.backup.keep_recent, 5);
        assert_eq!(settings.backup.keep_historical, 3);
        assert_eq!(settings.themes.default, "dark");
        assert_eq!(settings.ui.date_format, "%Y-%m-%d %H:%M");

        // The repair round-tripped to disk.
        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(paths.settings_file()).unwrap()).unwrap();
        assert_eq!(on_disk["backup"]["keep_historical"], 3);
        assert_eq!(on_disk["backup"]["keep_recent"], 5);
        assert_eq!(on_disk["ui"]["autosave"], true);
    }

    #[test]
    fn test_empty_path_strings_are_replaced() {
        let (_temp, paths) = test_paths();
        std::fs::create_dir_all(paths.config_dir()).unwrap();
        std::fs::write(
            paths.settings_file(),
            r#"{"paths": {"items_csv": "", "money_csv": "", "backup_dir": ""}}"#,
        )
        .unwrap();

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.paths.items_csv, paths.items_file());
        assert_eq!(settings.paths.money_csv, paths.money_file());
        assert_eq!(settings.paths.backup_dir, paths.backup_dir());
    }

    #[test]
    fn test_custom_paths_are_kept() {
        let (_temp, paths) = test_paths();
        std::fs::create_dir_all(paths.config_dir()).unwrap();
        std::fs::write(
            paths.settings_file(),
            r#"{"paths": {"items_csv": "/data/my-items.csv"}}"#,
        )
        .unwrap();

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.paths.items_csv, PathBuf::from("/data/my-items.csv"));
        // The other two were unset and get defaults.
        assert_eq!(settings.paths.money_csv, paths.money_file());
    }

    #[test]
    fn test_seeded_from_packaged_copy() {
        let (_temp, paths) = test_paths();
        let bundled = paths.base_dir().join("bundled");
        std::fs::create_dir_all(&bundled).unwrap();
        std::fs::write(
            bundled.join("settings.json"),
            r#"{"ui": {"currency_symbol": "kr"}}"#,
        )
        .unwrap();
        let paths = paths.with_bundled_dir(bundled);

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.ui.currency_symbol, "kr");
        // Missing keys in the packaged copy were still repaired.
        assert_eq!(settings.backup.keep_recent, 3);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let (_temp, paths) = test_paths();
        let mut settings = Settings::defaults(&paths);
        settings.backup.keep_recent = 9;
        settings.ui.autosave = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backup.keep_recent, 9);
        assert!(!loaded.ui.autosave);
    }
}

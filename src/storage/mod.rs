//! Storage layer for outlay-cli
//!
//! CSV collections guarded by advisory file locks, a whole-dataset bundle
//! format, and the `Storage` coordinator that wires configured paths to the
//! backup engine.

pub mod bundle;
pub mod collection;
pub mod lock;

pub use bundle::{read_bundle, write_bundle, Bundle, BundleMetadata, BundleOutcome, BUNDLE_VERSION};
pub use collection::{read_collection, write_collection, ReadOutcome};
pub use lock::{LockStatus, LockedFile};

use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::create_backup;
use crate::config::settings::{BackupPolicy, Settings};
use crate::error::{OutlayError, OutlayResult};
use crate::models::{ItemRecord, MoneyRecord};

/// Coordinates reads and writes of the configured data files
///
/// Every save goes through here so the backup engine runs after each write
/// (when autosave backups are enabled), matching the application's
/// save-then-snapshot flow.
pub struct Storage {
    items_path: PathBuf,
    money_path: PathBuf,
    backup_dir: PathBuf,
    policy: BackupPolicy,
    autosave_backup: bool,
}

/// What happened during a save
#[derive(Debug)]
pub struct SaveReport {
    /// Whether the write ran under the advisory lock
    pub lock: LockStatus,
    /// Snapshot created after the write, if autosave backups are on
    pub backup: Option<PathBuf>,
}

impl Storage {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            items_path: settings.paths.items_csv.clone(),
            money_path: settings.paths.money_csv.clone(),
            backup_dir: settings.paths.backup_dir.clone(),
            policy: settings.backup.clone(),
            autosave_backup: settings.ui.autosave,
        }
    }

    pub fn items_path(&self) -> &Path {
        &self.items_path
    }

    pub fn money_path(&self) -> &Path {
        &self.money_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn policy(&self) -> &BackupPolicy {
        &self.policy
    }

    pub fn load_items(&self) -> OutlayResult<ReadOutcome<ItemRecord>> {
        read_collection(&self.items_path)
    }

    pub fn load_money(&self) -> OutlayResult<ReadOutcome<MoneyRecord>> {
        read_collection(&self.money_path)
    }

    /// Replace the item collection on disk, then snapshot it
    pub fn save_items(&self, items: &[ItemRecord]) -> OutlayResult<SaveReport> {
        let lock = write_collection(&self.items_path, items)?;
        let backup = self.backup_after_save(&self.items_path)?;
        Ok(SaveReport { lock, backup })
    }

    /// Replace the money collection on disk, then snapshot it
    pub fn save_money(&self, entries: &[MoneyRecord]) -> OutlayResult<SaveReport> {
        let lock = write_collection(&self.money_path, entries)?;
        let backup = self.backup_after_save(&self.money_path)?;
        Ok(SaveReport { lock, backup })
    }

    fn backup_after_save(&self, source: &Path) -> OutlayResult<Option<PathBuf>> {
        if !self.autosave_backup {
            return Ok(None);
        }
        create_backup(source, &self.backup_dir, &self.policy).map(Some)
    }

    /// Create the files the application expects at startup if missing
    ///
    /// Data files are seeded as header-only collections so first reads see an
    /// empty dataset instead of a schema error.
    pub fn ensure_startup_files(&self) -> OutlayResult<()> {
        if !self.items_path.exists() {
            write_collection::<ItemRecord>(&self.items_path, &[])?;
        }
        if !self.money_path.exists() {
            write_collection::<MoneyRecord>(&self.money_path, &[])?;
        }
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            OutlayError::Io(format!(
                "Failed to create backup directory {}: {}",
                self.backup_dir.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::OutlayPaths;
    use crate::models::item::ItemRatings;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_storage(autosave: bool) -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::defaults(&paths);
        settings.ui.autosave = autosave;
        (temp_dir, Storage::from_settings(&settings))
    }

    fn item(product: &str) -> ItemRecord {
        ItemRecord::new(
            NaiveDate::from_ymd_opt(2026, 5, 20)
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap(),
            product,
            "",
            "",
            "",
            12.0,
            ItemRatings::default(),
            "",
            "none",
        )
    }

    #[test]
    fn test_ensure_startup_files() {
        let (_temp, storage) = test_storage(false);
        storage.ensure_startup_files().unwrap();

        assert!(storage.items_path().exists());
        assert!(storage.money_path().exists());
        assert!(storage.backup_dir().exists());

        // Seeded files read back as empty collections.
        assert!(storage.load_items().unwrap().records.is_empty());
        assert!(storage.load_money().unwrap().records.is_empty());
    }

    #[test]
    fn test_save_without_autosave_skips_backup() {
        let (_temp, storage) = test_storage(false);
        let report = storage.save_items(&[item("Desk")]).unwrap();

        assert!(report.lock.is_acquired());
        assert!(report.backup.is_none());
        assert_eq!(storage.load_items().unwrap().records.len(), 1);
    }

    #[test]
    fn test_save_with_autosave_creates_backup() {
        let (_temp, storage) = test_storage(true);
        let report = storage.save_items(&[item("Desk")]).unwrap();

        let backup = report.backup.expect("autosave should snapshot the file");
        assert!(backup.exists());
        assert!(backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("items_"));
    }
}

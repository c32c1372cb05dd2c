//! Snapshot creation and retention enforcement
//!
//! Snapshots are named `{stem}_{YYYYMMDDHHMMSS}{ext}` next to each other in
//! one backup directory, so retention is scoped per source file by the stem
//! prefix. Retention never fails the save that triggered it: enforcement
//! errors are swallowed by `create_backup` and individual deletion failures
//! are skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;

use crate::config::settings::BackupPolicy;
use crate::error::{OutlayError, OutlayResult};

/// One snapshot in the backup directory
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size_bytes: u64,
}

/// Copy `source` into `backup_dir` as a timestamped snapshot
///
/// Fails with `SourceMissing` when the source does not exist. Retention for
/// the source's stem runs before returning; its failures never propagate.
pub fn create_backup(
    source: &Path,
    backup_dir: &Path,
    policy: &BackupPolicy,
) -> OutlayResult<PathBuf> {
    if !source.exists() {
        return Err(OutlayError::SourceMissing {
            path: source.to_path_buf(),
        });
    }

    fs::create_dir_all(backup_dir).map_err(|e| {
        OutlayError::Io(format!(
            "Failed to create backup directory {}: {}",
            backup_dir.display(),
            e
        ))
    })?;

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| ".bak".to_string());
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let destination = backup_dir.join(format!("{}_{}{}", stem, timestamp, extension));

    fs::copy(source, &destination).map_err(|e| {
        OutlayError::Io(format!(
            "Failed to copy {} to {}: {}",
            source.display(),
            destination.display(),
            e
        ))
    })?;

    // Best-effort cleanup; a retention failure must not fail the save.
    let _ = enforce_retention(stem, backup_dir, policy);

    Ok(destination)
}

/// Prune snapshots for one stem down to the policy's limits
///
/// Keeps the `keep_recent` newest snapshots unconditionally, plus up to
/// `keep_historical` older ones sampled evenly across the age range. Returns
/// the paths that were deleted; files that cannot be deleted are skipped.
pub fn enforce_retention(
    stem: &str,
    backup_dir: &Path,
    policy: &BackupPolicy,
) -> OutlayResult<Vec<PathBuf>> {
    let mut backups = list_backups(stem, backup_dir)?;
    if backups.len() <= policy.keep_recent + policy.keep_historical {
        return Ok(Vec::new());
    }

    // list_backups returns newest first.
    let remainder = backups.split_off(policy.keep_recent);
    let recent = backups;
    let historical = select_historical(&remainder, policy.keep_historical);

    let mut keep: Vec<&Path> = recent.iter().map(|b| b.path.as_path()).collect();
    keep.extend(historical.iter().map(|b| b.path.as_path()));

    let mut deleted = Vec::new();
    for backup in &remainder {
        if keep.contains(&backup.path.as_path()) {
            continue;
        }
        if fs::remove_file(&backup.path).is_ok() {
            deleted.push(backup.path.clone());
        }
    }
    Ok(deleted)
}

/// List snapshots for one stem, newest first
pub fn list_backups(stem: &str, backup_dir: &Path) -> OutlayResult<Vec<BackupInfo>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}_", stem);
    let mut backups = Vec::new();

    for entry in fs::read_dir(backup_dir).map_err(|e| {
        OutlayError::Io(format!(
            "Failed to read backup directory {}: {}",
            backup_dir.display(),
            e
        ))
    })? {
        let entry =
            entry.map_err(|e| OutlayError::Io(format!("Failed to read directory entry: {}", e)))?;
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(&prefix) {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => continue,
        };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        backups.push(BackupInfo {
            path: entry.path(),
            modified,
            size_bytes: metadata.len(),
        });
    }

    backups.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(backups)
}

/// Sample up to `count` snapshots spread across the full age range
///
/// `remainder` arrives newest first; selection walks it oldest first in
/// strides of `len / count`, so survivors cover the whole range instead of
/// clustering at either end.
fn select_historical(remainder: &[BackupInfo], count: usize) -> Vec<BackupInfo> {
    if count == 0 || remainder.is_empty() {
        return Vec::new();
    }

    let mut oldest_first: Vec<&BackupInfo> = remainder.iter().collect();
    oldest_first.reverse();

    if oldest_first.len() <= count {
        return oldest_first.into_iter().cloned().collect();
    }

    let step = std::cmp::max(1, oldest_first.len() / count);
    oldest_first
        .into_iter()
        .step_by(step)
        .take(count)
        .cloned()
        .collect()
}

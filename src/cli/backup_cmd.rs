//! Backup CLI commands

use std::path::Path;

use clap::Subcommand;

use crate::backup::{create_backup, enforce_retention, list_backups};
use crate::error::OutlayResult;
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot both data files now
    Create,

    /// List snapshots, newest first
    List,

    /// Delete snapshots beyond the retention policy
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(storage: &Storage, cmd: BackupCommands) -> OutlayResult<()> {
    match cmd {
        BackupCommands::Create => {
            for source in [storage.items_path(), storage.money_path()] {
                let created = create_backup(source, storage.backup_dir(), storage.policy())?;
                println!("Backup created: {}", created.display());
            }
        }

        BackupCommands::List => {
            let mut total = 0;
            for source in [storage.items_path(), storage.money_path()] {
                let backups = list_backups(&stem_of(source), storage.backup_dir())?;
                for backup in &backups {
                    let name = backup
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| backup.path.display().to_string());
                    println!("  {} ({})", name, format_size(backup.size_bytes));
                }
                total += backups.len();
            }
            if total == 0 {
                println!("No backups found.");
                println!("Create one with: outlay backup create");
            } else {
                println!();
                println!("Total: {} backup(s)", total);
            }
        }

        BackupCommands::Prune => {
            let mut deleted = 0;
            for source in [storage.items_path(), storage.money_path()] {
                deleted +=
                    enforce_retention(&stem_of(source), storage.backup_dir(), storage.policy())?
                        .len();
            }
            println!("Pruned {} backup(s).", deleted);
        }
    }

    Ok(())
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file")
        .to_string()
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_stem_of() {
        assert_eq!(stem_of(Path::new("/data/items.csv")), "items");
        assert_eq!(stem_of(Path::new("ledger")), "ledger");
    }
}

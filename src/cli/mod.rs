//! CLI command handlers
//!
//! This module bridges clap argument parsing with the library: each data
//! domain gets a subcommand enum and a handler that loads collections through
//! the storage layer, applies the change and saves. Informational conditions
//! (lock degradation, config warnings) go to stderr; data errors propagate.

pub mod backup_cmd;
pub mod bundle_cmd;
pub mod item;
pub mod money;

pub use backup_cmd::{handle_backup_command, BackupCommands};
pub use bundle_cmd::{handle_bundle_command, BundleCommands};
pub use item::{handle_item_command, ItemCommands};
pub use money::{handle_money_command, MoneyCommands};

use std::path::Path;

use chrono::{Local, NaiveDateTime};

use crate::config::AppConfig;
use crate::error::{OutlayError, OutlayResult};
use crate::models::DATE_FMT;
use crate::storage::{LockStatus, SaveReport};

/// Parse an optional `--date` argument; absent means now
pub(crate) fn parse_date_arg(input: Option<&str>) -> OutlayResult<NaiveDateTime> {
    match input {
        Some(raw) => NaiveDateTime::parse_from_str(raw, DATE_FMT).map_err(|_| {
            OutlayError::Validation(format!(
                "Invalid date '{}'; expected format {}",
                raw, DATE_FMT
            ))
        }),
        None => Ok(Local::now().naive_local()),
    }
}

/// Report a degraded (unlocked) operation; informational, never fatal
pub(crate) fn warn_if_unlocked(lock: LockStatus, path: &Path) {
    if lock.is_degraded() {
        eprintln!(
            "warning: could not lock {}; the operation ran without the file lock",
            path.display()
        );
    }
}

pub(crate) fn report_save(report: &SaveReport, path: &Path) {
    warn_if_unlocked(report.lock, path);
}

/// Show the effective configuration and paths
pub fn handle_config_command(config: &AppConfig) {
    println!("Data directory: {}", config.paths.base_dir().display());
    println!("Items CSV: {}", config.settings.paths.items_csv.display());
    println!("Money CSV: {}", config.settings.paths.money_csv.display());
    println!(
        "Backup dir: {}",
        config.settings.paths.backup_dir.display()
    );
    println!(
        "Backup policy: keep {} recent, {} historical",
        config.settings.backup.keep_recent, config.settings.backup.keep_historical
    );
    println!("Theme: {}", config.settings.themes.default);
    println!("Themes available: {}", config.themes.names().join(", "));
    println!(
        "Autosave backups: {}",
        if config.settings.ui.autosave { "on" } else { "off" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_arg() {
        let parsed = parse_date_arg(Some("2026-03-01 10:30")).unwrap();
        assert_eq!(parsed.format(DATE_FMT).to_string(), "2026-03-01 10:30");
        assert!(parse_date_arg(Some("March 1st")).is_err());
        assert!(parse_date_arg(None).is_ok());
    }
}

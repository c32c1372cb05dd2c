//! Backup system for outlay-cli
//!
//! Timestamped snapshots of the data files with a two-tier retention policy:
//! a block of the newest snapshots is always kept, and a stratified sample of
//! older ones preserves coverage across the full age range.

mod manager;

pub use manager::{create_backup, enforce_retention, list_backups, BackupInfo};

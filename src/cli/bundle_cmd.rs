//! Bundle CLI commands
//!
//! Whole-dataset export and import through the single-document bundle format.

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::OutlayResult;
use crate::storage::{read_bundle, write_bundle, Storage};

use super::{report_save, warn_if_unlocked};

/// Bundle subcommands
#[derive(Subcommand)]
pub enum BundleCommands {
    /// Export both collections into one JSON document
    Export { path: PathBuf },

    /// Import a bundle document
    Import {
        path: PathBuf,
        /// Replace the current collections instead of appending
        #[arg(long)]
        replace: bool,
    },
}

/// Handle a bundle command
pub fn handle_bundle_command(storage: &Storage, cmd: BundleCommands) -> OutlayResult<()> {
    match cmd {
        BundleCommands::Export { path } => {
            let items = storage.load_items()?.records;
            let money = storage.load_money()?.records;

            let lock = write_bundle(&path, &items, &money)?;
            warn_if_unlocked(lock, &path);
            println!(
                "Exported {} item(s) and {} money entr(ies) to {}",
                items.len(),
                money.len(),
                path.display()
            );
        }

        BundleCommands::Import { path, replace } => {
            let outcome = read_bundle(&path)?;
            warn_if_unlocked(outcome.lock, &path);
            let bundle = outcome.bundle;

            let (items, money) = if replace {
                (bundle.items, bundle.money)
            } else {
                let mut items = storage.load_items()?.records;
                let mut money = storage.load_money()?.records;
                items.extend(bundle.items);
                money.extend(bundle.money);
                (items, money)
            };

            let report = storage.save_items(&items)?;
            report_save(&report, storage.items_path());
            let report = storage.save_money(&money)?;
            report_save(&report, storage.money_path());

            println!(
                "Imported bundle (version {}): {} item(s), {} money entr(ies).",
                bundle.metadata.version,
                items.len(),
                money.len()
            );
        }
    }

    Ok(())
}

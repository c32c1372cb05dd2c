//! Item CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::AppConfig;
use crate::error::{OutlayError, OutlayResult};
use crate::models::item::ItemRatings;
use crate::models::ItemRecord;
use crate::scoring::{apply_score, rescore_items};
use crate::storage::{read_collection, write_collection, Storage};

use super::{parse_date_arg, report_save, warn_if_unlocked};

/// Item subcommands
#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add a purchase item (scored immediately)
    Add {
        /// Product name
        product: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        reference: String,
        /// Cost (non-negative)
        #[arg(long)]
        cost: f64,
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=5))]
        urgency: i32,
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=5))]
        value: i32,
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=5))]
        want: i32,
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=5))]
        price_comp: i32,
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(i32).range(1..=5))]
        effect: i32,
        #[arg(long, default_value = "")]
        justification: String,
        #[arg(long, default_value = "none")]
        recurrence: String,
        /// Purchase date ("YYYY-MM-DD HH:MM"); defaults to now
        #[arg(long)]
        date: Option<String>,
    },

    /// List items, newest first
    List,

    /// Delete an item by id
    Delete { id: String },

    /// Import items from another CSV file
    Import {
        path: PathBuf,
        /// Replace the current collection instead of appending
        #[arg(long)]
        replace: bool,
    },

    /// Export items to a CSV file
    Export { path: PathBuf },

    /// Recompute every item's score with the current weights
    Rescore,
}

/// Handle an item command
pub fn handle_item_command(
    config: &AppConfig,
    storage: &Storage,
    cmd: ItemCommands,
) -> OutlayResult<()> {
    let outcome = storage.load_items()?;
    warn_if_unlocked(outcome.lock, storage.items_path());
    let mut items = outcome.records;

    match cmd {
        ItemCommands::Add {
            product,
            description,
            location,
            reference,
            cost,
            urgency,
            value,
            want,
            price_comp,
            effect,
            justification,
            recurrence,
            date,
        } => {
            if cost < 0.0 {
                return Err(OutlayError::Validation(format!(
                    "Cost must not be negative, got {}",
                    cost
                )));
            }
            let date = parse_date_arg(date.as_deref())?;
            let mut item = ItemRecord::new(
                date,
                product,
                description,
                location,
                reference,
                cost,
                ItemRatings {
                    urgency,
                    value,
                    want,
                    price_comp,
                    effect,
                },
                justification,
                recurrence,
            );
            let result = apply_score(&mut item, &config.scoring);
            items.push(item);

            let report = storage.save_items(&items)?;
            report_save(&report, storage.items_path());
            println!("Item added (score {:.2}).", result.overall);
        }

        ItemCommands::List => {
            if items.is_empty() {
                println!("No items found.");
                return Ok(());
            }
            items.sort_by(|a, b| b.date.cmp(&a.date));

            let ui = &config.settings.ui;
            for item in &items {
                let score = item
                    .overall_score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} | {} | {}{:.2} | urgency {} | score {} | {}",
                    item.id,
                    item.date.format(&ui.date_format),
                    ui.currency_symbol,
                    item.cost,
                    item.urgency,
                    score,
                    item.product,
                );
            }
            println!();
            println!("Total: {} item(s)", items.len());
        }

        ItemCommands::Delete { id } => {
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                return Err(OutlayError::item_not_found(id));
            }
            let report = storage.save_items(&items)?;
            report_save(&report, storage.items_path());
            println!("Item deleted.");
        }

        ItemCommands::Import { path, replace } => {
            let imported = read_collection::<ItemRecord>(&path)?;
            warn_if_unlocked(imported.lock, &path);
            let count = imported.records.len();

            if replace {
                items = imported.records;
            } else {
                items.extend(imported.records);
            }
            let report = storage.save_items(&items)?;
            report_save(&report, storage.items_path());
            println!("Imported {} item(s).", count);
        }

        ItemCommands::Export { path } => {
            let lock = write_collection(&path, &items)?;
            warn_if_unlocked(lock, &path);
            println!("Exported {} item(s) to {}", items.len(), path.display());
        }

        ItemCommands::Rescore => {
            rescore_items(&mut items, &config.scoring);
            let count = items.len();
            let report = storage.save_items(&items)?;
            report_save(&report, storage.items_path());
            println!("Rescored {} item(s).", count);
        }
    }

    Ok(())
}

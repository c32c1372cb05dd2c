//! Money CLI commands

use std::collections::HashMap;

use clap::Subcommand;

use crate::config::AppConfig;
use crate::error::{OutlayError, OutlayResult};
use crate::models::{MoneyRecord, MoneySummary};
use crate::storage::Storage;

use super::{parse_date_arg, report_save, warn_if_unlocked};

/// Money subcommands
#[derive(Subcommand)]
pub enum MoneyCommands {
    /// Add a money entry
    Add {
        /// Entry type: income or expense
        #[arg(long)]
        entry_type: String,
        /// Where the money came from or went
        #[arg(long)]
        source: String,
        /// Amount (non-negative)
        #[arg(long)]
        amount: f64,
        #[arg(long, default_value = "")]
        notes: String,
        /// Item id this movement pays for
        #[arg(long)]
        linked_item: Option<String>,
        /// Entry date ("YYYY-MM-DD HH:MM"); defaults to now
        #[arg(long)]
        date: Option<String>,
    },

    /// List entries with an income/expense summary, newest first
    List,

    /// Delete an entry by id
    Delete { id: String },
}

/// Handle a money command
pub fn handle_money_command(
    config: &AppConfig,
    storage: &Storage,
    cmd: MoneyCommands,
) -> OutlayResult<()> {
    let outcome = storage.load_money()?;
    warn_if_unlocked(outcome.lock, storage.money_path());
    let mut entries = outcome.records;

    match cmd {
        MoneyCommands::Add {
            entry_type,
            source,
            amount,
            notes,
            linked_item,
            date,
        } => {
            if amount < 0.0 {
                return Err(OutlayError::Validation(format!(
                    "Amount must not be negative, got {}",
                    amount
                )));
            }
            let date = parse_date_arg(date.as_deref())?;
            entries.push(MoneyRecord::new(
                date,
                entry_type,
                source,
                amount,
                notes,
                linked_item,
            ));

            let report = storage.save_money(&entries)?;
            report_save(&report, storage.money_path());
            println!("Money entry added.");
        }

        MoneyCommands::List => {
            if entries.is_empty() {
                println!("No money entries found.");
                return Ok(());
            }
            entries.sort_by(|a, b| b.date.cmp(&a.date));

            // Lazy resolution of linked item names; dangling ids are shown
            // as-is rather than rejected.
            let items = storage.load_items()?.records;
            let products: HashMap<&str, &str> = items
                .iter()
                .map(|item| (item.id.as_str(), item.product.as_str()))
                .collect();

            let ui = &config.settings.ui;
            for entry in &entries {
                let linked = match entry.linked_item_id.as_deref() {
                    Some(id) => products.get(id).copied().unwrap_or(id),
                    None => "unlinked",
                };
                println!(
                    "{} | {} | {} | {}{:.2} | {} | {}",
                    entry.id,
                    entry.date.format(&ui.date_format),
                    entry.entry_type,
                    ui.currency_symbol,
                    entry.amount,
                    entry.source_or_destination,
                    linked,
                );
            }

            let summary = MoneySummary::of(&entries);
            println!();
            println!(
                "Income: {sym}{:.2}  Expenses: {sym}{:.2}  Balance: {sym}{:.2}",
                summary.income,
                summary.expenses,
                summary.balance(),
                sym = ui.currency_symbol,
            );
        }

        MoneyCommands::Delete { id } => {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                return Err(OutlayError::entry_not_found(id));
            }
            let report = storage.save_money(&entries)?;
            report_save(&report, storage.money_path());
            println!("Money entry deleted.");
        }
    }

    Ok(())
}

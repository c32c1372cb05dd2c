use anyhow::Result;
use clap::{Parser, Subcommand};

use outlay_cli::cli::{
    handle_backup_command, handle_bundle_command, handle_config_command, handle_item_command,
    handle_money_command, BackupCommands, BundleCommands, ItemCommands, MoneyCommands,
};
use outlay_cli::config::AppConfig;
use outlay_cli::storage::Storage;

#[derive(Parser)]
#[command(
    name = "outlay",
    version,
    about = "Local-first purchase planning and money tracking",
    long_about = "outlay keeps a scored list of purchase items and a ledger of \
                  money movements in plain CSV files, snapshots them on every \
                  save, and prioritizes purchases with configurable weights."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Purchase item commands
    #[command(subcommand)]
    Item(ItemCommands),

    /// Money ledger commands
    #[command(subcommand)]
    Money(MoneyCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Whole-dataset export/import
    #[command(subcommand)]
    Bundle(BundleCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    for warning in &config.warnings {
        eprintln!("warning: {}", warning);
    }

    let storage = Storage::from_settings(&config.settings);
    storage.ensure_startup_files()?;

    match cli.command {
        Commands::Item(cmd) => handle_item_command(&config, &storage, cmd)?,
        Commands::Money(cmd) => handle_money_command(&config, &storage, cmd)?,
        Commands::Backup(cmd) => handle_backup_command(&storage, cmd)?,
        Commands::Bundle(cmd) => handle_bundle_command(&storage, cmd)?,
        Commands::Config => handle_config_command(&config),
    }

    Ok(())
}

//! outlay-cli - Local-first purchase planning and money tracking
//!
//! This library provides the core functionality for the outlay CLI: purchase
//! items and money movements persisted to lock-guarded CSV files, timestamped
//! backups under a two-tier retention policy, and a configurable priority
//! score for purchase decisions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: path resolution and the three-document config cascade
//! - `error`: custom error types
//! - `models`: record types and their flat-row representation
//! - `storage`: lock-guarded collection and bundle persistence
//! - `backup`: snapshot creation and retention
//! - `scoring`: the purchase priority score
//! - `cli`: command handlers for the `outlay` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use outlay_cli::config::AppConfig;
//! use outlay_cli::storage::Storage;
//!
//! let config = AppConfig::load()?;
//! let storage = Storage::from_settings(&config.settings);
//! let items = storage.load_items()?.records;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod scoring;
pub mod storage;

pub use error::{OutlayError, OutlayResult};

//! Configuration for outlay-cli
//!
//! Three independent documents live under the user config directory:
//! `settings.json`, `weights.txt` and `themes.json`. Each is seeded on first
//! run (from a packaged default file when one ships next to the executable,
//! else from the in-memory default) and repaired with field-level defaults on
//! load. `AppConfig` bundles the result into one immutable value constructed
//! at startup and passed by reference into the storage, backup and scoring
//! components.

pub mod loader;
pub mod paths;
pub mod settings;
pub mod theme;
pub mod weights;

pub use paths::OutlayPaths;
pub use settings::{BackupPolicy, Settings};
pub use theme::{TableColors, Theme, ThemeSet};
pub use weights::{ScoringConfig, WeightsLoad};

use crate::error::OutlayResult;

/// The process-wide configuration, loaded once at startup
#[derive(Debug)]
pub struct AppConfig {
    pub paths: OutlayPaths,
    pub settings: Settings,
    pub scoring: ScoringConfig,
    pub themes: ThemeSet,
    /// Non-fatal problems found while loading (reported, never raised)
    pub warnings: Vec<String>,
}

impl AppConfig {
    /// Load all configuration from the platform data directory
    pub fn load() -> OutlayResult<Self> {
        Self::load_from(OutlayPaths::new()?)
    }

    /// Load all configuration from an explicit path layout
    pub fn load_from(paths: OutlayPaths) -> OutlayResult<Self> {
        paths.ensure_directories()?;

        let settings = Settings::load_or_create(&paths)?;
        let weights = weights::load_or_create(&paths)?;
        let themes = ThemeSet::load_or_create(&paths)?;

        Ok(Self {
            paths,
            settings,
            scoring: weights.config,
            themes,
            warnings: weights.warnings,
        })
    }

    /// Resolve the currently selected theme
    pub fn theme(&self) -> Theme {
        self.themes.resolve(&self.settings.themes.default)
    }
}

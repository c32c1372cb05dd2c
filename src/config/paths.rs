//! Path management for outlay-cli
//!
//! Resolves the user-writable data root and the fixed file layout under it.
//!
//! ## Path Resolution Order
//!
//! 1. `OUTLAY_DATA_DIR` environment variable (if set)
//! 2. The platform data directory via `directories::ProjectDirs`
//!    (e.g. `~/.local/share/outlay` on Linux, `%APPDATA%\outlay` on Windows)
//!
//! Packaged default config files (used to seed a fresh install) are looked up
//! in `OUTLAY_BUNDLED_CONFIG` or, failing that, a `config/` directory next to
//! the executable.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::OutlayError;

/// Manages all paths used by outlay-cli
#[derive(Debug, Clone)]
pub struct OutlayPaths {
    /// Base directory for all outlay data
    base_dir: PathBuf,
    /// Directory holding packaged default config files, if any
    bundled_dir: Option<PathBuf>,
}

impl OutlayPaths {
    /// Create a new OutlayPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined.
    pub fn new() -> Result<Self, OutlayError> {
        let base_dir = if let Ok(custom) = std::env::var("OUTLAY_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self {
            base_dir,
            bundled_dir: resolve_bundled_dir(),
        })
    }

    /// Create OutlayPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            bundled_dir: None,
        }
    }

    /// Override the packaged-defaults directory (useful for testing)
    pub fn with_bundled_dir(mut self, dir: PathBuf) -> Self {
        self.bundled_dir = Some(dir);
        self
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Config documents directory
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.join("config")
    }

    /// Default location of the data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default snapshot directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir().join("settings.json")
    }

    pub fn weights_file(&self) -> PathBuf {
        self.config_dir().join("weights.txt")
    }

    pub fn themes_file(&self) -> PathBuf {
        self.config_dir().join("themes.json")
    }

    pub fn items_file(&self) -> PathBuf {
        self.data_dir().join("items.csv")
    }

    pub fn money_file(&self) -> PathBuf {
        self.data_dir().join("money.csv")
    }

    /// Packaged default payload for a config document, when present
    pub fn bundled_file(&self, name: &str) -> Option<PathBuf> {
        let path = self.bundled_dir.as_ref()?.join(name);
        path.exists().then_some(path)
    }

    /// Ensure the base, config, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), OutlayError> {
        for dir in [
            self.base_dir.clone(),
            self.config_dir(),
            self.data_dir(),
            self.backup_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                OutlayError::Io(format!("Failed to create directory {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, OutlayError> {
    ProjectDirs::from("", "", "outlay")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| OutlayError::Config("Could not determine platform data directory".into()))
}

fn resolve_bundled_dir() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var("OUTLAY_BUNDLED_CONFIG") {
        return Some(PathBuf::from(custom));
    }
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("config"))
}

/// True when a configured path is unset (empty string in the document)
pub(crate) fn is_unset(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

//! Theme palettes
//!
//! The themes document is a free-form map of theme name to palette. Entries
//! may be partial: resolution falls back per field to the `light` theme and
//! then to hardcoded colors, and table colors fall back to the resolved
//! background/foreground, so the presentation layer always receives a fully
//! populated palette.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{OutlayError, OutlayResult};

use super::loader::load_or_seed_json;
use super::paths::OutlayPaths;

const FALLBACK_BACKGROUND: &str = "#ffffff";
const FALLBACK_FOREGROUND: &str = "#000000";
const FALLBACK_ACCENT: &str = "#2563eb";
const FALLBACK_MUTED: &str = "#94a3b8";

/// A fully resolved palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: String,
    pub foreground: String,
    pub accent: String,
    pub muted: String,
    pub table: TableColors,
}

/// Fully resolved table colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColors {
    pub header_bg: String,
    pub header_fg: String,
    pub row_bg: String,
    pub alt_row_bg: String,
}

/// One theme entry as stored on disk (possibly partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    muted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table: Option<RawTable>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_fg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row_bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alt_row_bg: Option<String>,
}

/// The themes document: name -> palette
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeSet {
    themes: BTreeMap<String, RawTheme>,
}

impl ThemeSet {
    /// Load the themes document, seeding the defaults on first run
    pub fn load_or_create(paths: &OutlayPaths) -> OutlayResult<Self> {
        let default_doc = serde_json::to_value(default_set())
            .map_err(|e| OutlayError::Json(format!("Failed to serialize defaults: {}", e)))?;
        let packaged = paths.bundled_file("themes.json");
        let document = load_or_seed_json(&paths.themes_file(), packaged.as_deref(), &default_doc)?;
        serde_json::from_value(document).map_err(|e| {
            OutlayError::Config(format!(
                "Failed to parse {}: {}",
                paths.themes_file().display(),
                e
            ))
        })
    }

    /// Save the themes document to disk
    pub fn save(&self, paths: &OutlayPaths) -> OutlayResult<()> {
        let path = paths.themes_file();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutlayError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| OutlayError::Json(format!("Failed to serialize themes: {}", e)))?;
        std::fs::write(&path, contents)
            .map_err(|e| OutlayError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Available theme names
    pub fn names(&self) -> Vec<&str> {
        self.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Resolve a theme by name into a fully populated palette
    ///
    /// Unknown names resolve to the `light` theme; missing fields fall back
    /// to `light`'s values and then to hardcoded defaults.
    pub fn resolve(&self, name: &str) -> Theme {
        let base = self.themes.get("light");
        let selected = self.themes.get(name).or(base);

        let pick = |field: fn(&RawTheme) -> Option<&String>, fallback: &str| -> String {
            selected
                .and_then(field)
                .or_else(|| base.and_then(field))
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        let background = pick(|t| t.background.as_ref(), FALLBACK_BACKGROUND);
        let foreground = pick(|t| t.foreground.as_ref(), FALLBACK_FOREGROUND);
        let accent = pick(|t| t.accent.as_ref(), FALLBACK_ACCENT);
        let muted = pick(|t| t.muted.as_ref(), FALLBACK_MUTED);

        let pick_table = |field: fn(&RawTable) -> Option<&String>, fallback: &str| -> String {
            selected
                .and_then(|t| t.table.as_ref())
                .and_then(field)
                .or_else(|| base.and_then(|t| t.table.as_ref()).and_then(field))
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        let table = TableColors {
            header_bg: pick_table(|t| t.header_bg.as_ref(), &background),
            header_fg: pick_table(|t| t.header_fg.as_ref(), &foreground),
            row_bg: pick_table(|t| t.row_bg.as_ref(), &background),
            alt_row_bg: pick_table(|t| t.alt_row_bg.as_ref(), &background),
        };

        Theme {
            background,
            foreground,
            accent,
            muted,
            table,
        }
    }
}

fn default_set() -> ThemeSet {
    let mut themes = BTreeMap::new();
    themes.insert(
        "light".to_string(),
        RawTheme {
            background: Some("#f7f9fb".into()),
            foreground: Some("#0f172a".into()),
            accent: Some("#2563eb".into()),
            muted: Some("#94a3b8".into()),
            table: Some(RawTable {
                header_bg: Some("#e2e8f0".into()),
                header_fg: Some("#0f172a".into()),
                row_bg: Some("#ffffff".into()),
                alt_row_bg: Some("#f1f5f9".into()),
            }),
        },
    );
    themes.insert(
        "dark".to_string(),
        RawTheme {
            background: Some("#0b1220".into()),
            foreground: Some("#e2e8f0".into()),
            accent: Some("#60a5fa".into()),
            muted: Some("#94a3b8".into()),
            table: Some(RawTable {
                header_bg: Some("#1f2937".into()),
                header_fg: Some("#e5e7eb".into()),
                row_bg: Some("#111827".into()),
                alt_row_bg: Some("#0b1220".into()),
            }),
        },
    );
    ThemeSet { themes }
}

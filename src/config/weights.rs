//! Scoring weights configuration
//!
//! The weights document is a deliberately simple line-oriented text file
//! (`key=value`, `#` comments) so it can be edited by hand without a JSON
//! round trip. Unknown keys and malformed values are collected as warnings
//! and reported to the caller; the affected field keeps its default, so a
//! typo never prevents the application from starting.

use serde::{Deserialize, Serialize};

use crate::error::OutlayResult;

use super::loader::load_or_seed_text;
use super::paths::OutlayPaths;

/// Multiplier per scoring component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub date: f64,
    pub cost: f64,
    pub urgency: f64,
    pub value: f64,
    pub want: f64,
    pub price_comp: f64,
    pub effect: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            date: 1.0,
            cost: 1.0,
            urgency: 1.0,
            value: 1.0,
            want: 1.0,
            price_comp: 1.0,
            effect: 1.0,
        }
    }
}

/// Age thresholds (in days) for the date component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateScoring {
    pub recent_days: i64,
    pub mid_days: i64,
}

impl Default for DateScoring {
    fn default() -> Self {
        Self {
            recent_days: 7,
            mid_days: 30,
        }
    }
}

/// One cost band: `max == None` means unbounded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBand {
    pub max: Option<f64>,
    pub score: f64,
}

/// Everything the scoring engine needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: Weights,
    pub date_scoring: DateScoring,
    /// Ascending maxima; the first matching band wins
    pub cost_bands: Vec<CostBand>,
    /// Urgency rating that pins the date score at maximum
    pub urgency_override: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            date_scoring: DateScoring::default(),
            cost_bands: vec![
                CostBand {
                    max: Some(50.0),
                    score: 5.0,
                },
                CostBand {
                    max: Some(150.0),
                    score: 4.0,
                },
                CostBand {
                    max: Some(400.0),
                    score: 3.0,
                },
                CostBand {
                    max: Some(800.0),
                    score: 2.0,
                },
                CostBand {
                    max: None,
                    score: 1.0,
                },
            ],
            urgency_override: 5,
        }
    }
}

/// A loaded scoring config plus the non-fatal warnings collected on the way
#[derive(Debug)]
pub struct WeightsLoad {
    pub config: ScoringConfig,
    pub warnings: Vec<String>,
}

/// Load the weights document, seeding a template on first run
pub fn load_or_create(paths: &OutlayPaths) -> OutlayResult<WeightsLoad> {
    let path = paths.weights_file();
    let packaged = paths.bundled_file("weights.txt");
    let template = render_template(&ScoringConfig::default());
    let (contents, created) = load_or_seed_text(&path, packaged.as_deref(), &template)?;

    let (config, mut warnings) = parse_weights(&contents);
    if created {
        warnings.push(format!(
            "Weights file not found. A default template was created at {}.",
            path.display()
        ));
    }
    Ok(WeightsLoad { config, warnings })
}

/// Persist a scoring config back to the editable text document
pub fn save(config: &ScoringConfig, paths: &OutlayPaths) -> OutlayResult<()> {
    let path = paths.weights_file();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            crate::error::OutlayError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    std::fs::write(&path, render_template(config)).map_err(|e| {
        crate::error::OutlayError::Io(format!("Failed to write {}: {}", path.display(), e))
    })
}

/// Parse the line-oriented weights format
///
/// Starts from the defaults and overlays every recognized key. Problems are
/// collected as warnings, never raised.
pub fn parse_weights(text: &str) -> (ScoringConfig, Vec<String>) {
    let mut config = ScoringConfig::default();
    let mut warnings = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let number = number + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            warnings.push(format!("Line {}: missing '=' separator; ignored.", number));
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if let Some(component) = key.strip_prefix("weight_") {
            let slot = match component {
                "date" => &mut config.weights.date,
                "cost" => &mut config.weights.cost,
                "urgency" => &mut config.weights.urgency,
                "value" => &mut config.weights.value,
                "want" => &mut config.weights.want,
                "price_comp" => &mut config.weights.price_comp,
                "effect" => &mut config.weights.effect,
                _ => {
                    warnings.push(format!("Line {}: unknown key '{}'; ignored.", number, key));
                    continue;
                }
            };
            match value.parse::<f64>() {
                Ok(weight) if weight >= 0.0 => *slot = weight,
                _ => warnings.push(format!(
                    "Line {}: invalid weight for {}; using default.",
                    number, key
                )),
            }
        } else if key == "date_recent_days" {
            match value.parse::<i64>() {
                Ok(days) => config.date_scoring.recent_days = days,
                Err(_) => warnings.push(format!(
                    "Line {}: invalid integer for date_recent_days; using default.",
                    number
                )),
            }
        } else if key == "date_mid_days" {
            match value.parse::<i64>() {
                Ok(days) => config.date_scoring.mid_days = days,
                Err(_) => warnings.push(format!(
                    "Line {}: invalid integer for date_mid_days; using default.",
                    number
                )),
            }
        } else if key == "urgency_override" {
            match value.parse::<i32>() {
                Ok(urgency) => config.urgency_override = urgency,
                Err(_) => warnings.push(format!(
                    "Line {}: invalid integer for urgency_override; using default.",
                    number
                )),
            }
        } else if let Some(rest) = key.strip_prefix("cost_band") {
            apply_band_key(&mut config, rest, key, value, number, &mut warnings);
        } else {
            warnings.push(format!("Line {}: unknown key '{}'; ignored.", number, key));
        }
    }

    (config, warnings)
}

fn apply_band_key(
    config: &mut ScoringConfig,
    rest: &str,
    key: &str,
    value: &str,
    number: usize,
    warnings: &mut Vec<String>,
) {
    let parsed = rest.split_once('_').and_then(|(index, field)| {
        let index: usize = index.parse().ok().filter(|&i| i >= 1)?;
        matches!(field, "max" | "score").then_some((index, field))
    });
    let Some((index, field)) = parsed else {
        warnings.push(format!(
            "Line {}: invalid band index in {}; ignored.",
            number, key
        ));
        return;
    };

    while config.cost_bands.len() < index {
        config.cost_bands.push(CostBand {
            max: None,
            score: 1.0,
        });
    }
    let band = &mut config.cost_bands[index - 1];

    if field == "max" {
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            band.max = None;
        } else {
            match value.parse::<f64>() {
                Ok(max) => band.max = Some(max),
                Err(_) => warnings.push(format!(
                    "Line {}: invalid max for {}; using default.",
                    number, key
                )),
            }
        }
    } else {
        match value.parse::<f64>() {
            Ok(score) => band.score = score,
            Err(_) => warnings.push(format!(
                "Line {}: invalid score for {}; using default.",
                number, key
            )),
        }
    }
}

/// Render a config as the editable text document
pub fn render_template(config: &ScoringConfig) -> String {
    let mut lines = vec![
        "# Purchase scoring weights".to_string(),
        "# Edit values and restart the app to apply changes.".to_string(),
        String::new(),
        format!("weight_date={}", config.weights.date),
        format!("weight_cost={}", config.weights.cost),
        format!("weight_urgency={}", config.weights.urgency),
        format!("weight_value={}", config.weights.value),
        format!("weight_want={}", config.weights.want),
        format!("weight_price_comp={}", config.weights.price_comp),
        format!("weight_effect={}", config.weights.effect),
        String::new(),
        format!("date_recent_days={}", config.date_scoring.recent_days),
        format!("date_mid_days={}", config.date_scoring.mid_days),
        String::new(),
        "# Cost bands: ascending maximum (use 'none' for no upper bound)".to_string(),
    ];
    for (index, band) in config.cost_bands.iter().enumerate() {
        let max = band
            .max
            .map(|m| m.to_string())
            .unwrap_or_else(|| "none".to_string());
        lines.push(format!("cost_band{}_max={}", index + 1, max));
        lines.push(format!("cost_band{}_score={}", index + 1, band.score));
    }
    lines.push(String::new());
    lines.push(format!("urgency_override={}", config.urgency_override));
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_round_trip() {
        let default = ScoringConfig::default();
        let (parsed, warnings) = parse_weights(&render_template(&default));
        assert_eq!(parsed, default);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let (config, warnings) = parse_weights("# comment\n\n   \nweight_date=2.5\n");
        assert_eq!(config.weights.date, 2.5);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_key_warns_and_is_ignored() {
        let (config, warnings) = parse_weights("weight_shiny=2\nbudget_mode=strict\n");
        assert_eq!(config, ScoringConfig::default());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("unknown key 'weight_shiny'"));
        assert!(warnings[1].contains("unknown key 'budget_mode'"));
    }

    #[test]
    fn test_malformed_value_warns_and_keeps_default() {
        let (config, warnings) = parse_weights("weight_cost=heavy\ndate_recent_days=soon\n");
        assert_eq!(config.weights.cost, 1.0);
        assert_eq!(config.date_scoring.recent_days, 7);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Line 1"));
        assert!(warnings[1].contains("Line 2"));
    }

    #[test]
    fn test_missing_separator_warns() {
        let (_, warnings) = parse_weights("weight_date 2\n");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing '='"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let (config, warnings) = parse_weights("weight_value=-1\n");
        assert_eq!(config.weights.value, 1.0);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_cost_band_overrides() {
        let text = "cost_band1_max=25\ncost_band1_score=5\ncost_band6_max=none\ncost_band6_score=0.5\n";
        let (config, warnings) = parse_weights(text);
        assert!(warnings.is_empty());
        assert_eq!(config.cost_bands[0].max, Some(25.0));
        assert_eq!(config.cost_bands[0].score, 5.0);
        // Band 6 grew the default list of five.
        assert_eq!(config.cost_bands.len(), 6);
        assert_eq!(config.cost_bands[5].max, None);
        assert_eq!(config.cost_bands[5].score, 0.5);
    }

    #[test]
    fn test_bad_band_key_warns() {
        let (config, warnings) = parse_weights("cost_bandX_max=10\ncost_band2_limit=10\n");
        assert_eq!(config.cost_bands, ScoringConfig::default().cost_bands);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("invalid band index"));
    }

    #[test]
    fn test_urgency_override_key() {
        let (config, warnings) = parse_weights("urgency_override=4\n");
        assert!(warnings.is_empty());
        assert_eq!(config.urgency_override, 4);
    }

    #[test]
    fn test_load_or_create_seeds_template() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());

        let load = load_or_create(&paths).unwrap();
        assert_eq!(load.config, ScoringConfig::default());
        // The creation notice is a warning, not an error.
        assert_eq!(load.warnings.len(), 1);
        assert!(load.warnings[0].contains("default template was created"));
        assert!(paths.weights_file().exists());

        // Second load is quiet.
        let load = load_or_create(&paths).unwrap();
        assert!(load.warnings.is_empty());
    }

    #[test]
    fn test_save_round_trips_through_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut config = ScoringConfig::default();
        config.weights.cost = 2.0;
        config.urgency_override = 4;
        save(&config, &paths).unwrap();

        let load = load_or_create(&paths).unwrap();
        assert!(load.warnings.is_empty());
        assert_eq!(load.config, config);
    }

    #[test]
    fn test_load_or_create_reads_edits() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OutlayPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::create_dir_all(paths.config_dir()).unwrap();
        std::fs::write(paths.weights_file(), "weight_want=3\nurgency_override=4\n").unwrap();

        let load = load_or_create(&paths).unwrap();
        assert!(load.warnings.is_empty());
        assert_eq!(load.config.weights.want, 3.0);
        assert_eq!(load.config.urgency_override, 4);
        // Untouched keys keep their defaults.
        assert_eq!(load.config.weights.date, 1.0);
    }
}

//! Purchase priority scoring
//!
//! Converts an item plus the configured weights into a normalized priority
//! score. The semantics are "how much attention this needs": recent purchases
//! score low for re-evaluation, stale ones high, and an urgency rating equal
//! to the configured override pins the date component at maximum regardless
//! of age.
//!
//! Scoring is pure; callers store the overall back onto the record (see
//! [`apply_score`]) and persist it themselves.

use chrono::{Local, NaiveDateTime};

use crate::config::weights::{CostBand, DateScoring, ScoringConfig};
use crate::models::ItemRecord;

/// Per-component scores plus the weighted overall
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub field_scores: FieldScores,
    pub overall: f64,
}

/// One score per component, before weighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScores {
    pub date: f64,
    pub cost: f64,
    pub urgency: f64,
    pub value: f64,
    pub want: f64,
    pub price_comp: f64,
    pub effect: f64,
}

impl FieldScores {
    /// Component scores as (name, score) pairs, in component order
    pub fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("date", self.date),
            ("cost", self.cost),
            ("urgency", self.urgency),
            ("value", self.value),
            ("want", self.want),
            ("price_comp", self.price_comp),
            ("effect", self.effect),
        ]
    }
}

/// Score an item against the configured weights, as of now
pub fn score_item(item: &ItemRecord, config: &ScoringConfig) -> ScoreResult {
    score_item_at(item, config, Local::now().naive_local())
}

/// Score an item with an explicit "now" (deterministic variant)
pub fn score_item_at(item: &ItemRecord, config: &ScoringConfig, now: NaiveDateTime) -> ScoreResult {
    let field_scores = FieldScores {
        date: score_date(
            item.date,
            item.urgency,
            &config.date_scoring,
            config.urgency_override,
            now,
        ),
        cost: score_cost(item.cost, &config.cost_bands),
        urgency: item.urgency as f64,
        value: item.value as f64,
        want: item.want as f64,
        price_comp: item.price_comp as f64,
        effect: item.effect as f64,
    };

    let weights = &config.weights;
    let pairs = [
        (field_scores.date, weights.date),
        (field_scores.cost, weights.cost),
        (field_scores.urgency, weights.urgency),
        (field_scores.value, weights.value),
        (field_scores.want, weights.want),
        (field_scores.price_comp, weights.price_comp),
        (field_scores.effect, weights.effect),
    ];

    ScoreResult {
        field_scores,
        overall: weighted_average(&pairs),
    }
}

/// Score an item and store the overall back onto it
pub fn apply_score(item: &mut ItemRecord, config: &ScoringConfig) -> ScoreResult {
    let result = score_item(item, config);
    item.overall_score = Some(result.overall);
    result
}

/// Recompute and store scores for every item, e.g. after weight edits
pub fn rescore_items(items: &mut [ItemRecord], config: &ScoringConfig) {
    for item in items {
        apply_score(item, config);
    }
}

fn score_date(
    date: NaiveDateTime,
    urgency: i32,
    date_scoring: &DateScoring,
    urgency_override: i32,
    now: NaiveDateTime,
) -> f64 {
    if urgency == urgency_override {
        return 5.0;
    }
    let days_old = now.signed_duration_since(date).num_days();
    if days_old <= date_scoring.recent_days {
        1.0
    } else if days_old <= date_scoring.mid_days {
        3.0
    } else {
        5.0
    }
}

/// First band whose max is unbounded or at least the cost wins
fn score_cost(cost: f64, bands: &[CostBand]) -> f64 {
    for band in bands {
        match band.max {
            Some(max) if cost <= max => return band.score,
            Some(_) => continue,
            None => return band.score,
        }
    }
    1.0
}

fn weighted_average(pairs: &[(f64, f64)]) -> f64 {
    let numerator: f64 = pairs.iter().map(|(score, weight)| score * weight).sum();
    let mut denominator: f64 = pairs.iter().map(|(_, weight)| weight).sum();
    if denominator == 0.0 {
        denominator = 1.0;
    }
    numerator / denominator
}

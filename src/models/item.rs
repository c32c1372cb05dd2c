//! Purchase item records
//!
//! An item is one candidate or completed purchase with five 1-5 ratings that
//! feed the priority score. The `want` rating was added in a later schema
//! revision; files written before it default the column to the mid rating.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    fmt_decimal, parse_row_date, parse_row_decimal, parse_row_rating, parse_row_score, row_value,
    RowError, RowRecord, DATE_FMT,
};

/// Default for the `want` rating when the column is absent (older files)
pub const DEFAULT_WANT: i32 = 3;

/// Default for ratings left empty in a row
const DEFAULT_RATING: i32 = 1;

const HEADERS: &[&str] = &[
    "id",
    "date",
    "product",
    "description",
    "location",
    "reference",
    "cost",
    "urgency",
    "value",
    "want",
    "price_comp",
    "effect",
    "justification",
    "recurrence",
    "overall_score",
];

// Everything except `want`, which newer schema versions added.
const REQUIRED: &[&str] = &[
    "id",
    "date",
    "product",
    "description",
    "location",
    "reference",
    "cost",
    "urgency",
    "value",
    "price_comp",
    "effect",
    "justification",
    "recurrence",
    "overall_score",
];

/// A single purchase item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Opaque unique id (UUID v4 for records created here)
    pub id: String,
    pub date: NaiveDateTime,
    pub product: String,
    pub description: String,
    pub location: String,
    pub reference: String,
    /// Non-negative; rows store it 2-decimal fixed
    pub cost: f64,
    pub urgency: i32,
    pub value: i32,
    pub want: i32,
    pub price_comp: i32,
    pub effect: i32,
    pub justification: String,
    pub recurrence: String,
    /// Derived priority score; `None` until scored
    pub overall_score: Option<f64>,
}

impl ItemRecord {
    /// Create a new unscored item with a fresh id
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDateTime,
        product: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        reference: impl Into<String>,
        cost: f64,
        ratings: ItemRatings,
        justification: impl Into<String>,
        recurrence: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            product: product.into(),
            description: description.into(),
            location: location.into(),
            reference: reference.into(),
            cost,
            urgency: ratings.urgency,
            value: ratings.value,
            want: ratings.want,
            price_comp: ratings.price_comp,
            effect: ratings.effect,
            justification: justification.into(),
            recurrence: recurrence.into(),
            overall_score: None,
        }
    }
}

/// The five 1-5 ratings of an item, bundled to keep constructors readable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRatings {
    pub urgency: i32,
    pub value: i32,
    pub want: i32,
    pub price_comp: i32,
    pub effect: i32,
}

impl Default for ItemRatings {
    fn default() -> Self {
        Self {
            urgency: 3,
            value: 3,
            want: 3,
            price_comp: 3,
            effect: 3,
        }
    }
}

impl RowRecord for ItemRecord {
    const KIND: &'static str = "item";

    fn headers() -> &'static [&'static str] {
        HEADERS
    }

    fn required_columns() -> &'static [&'static str] {
        REQUIRED
    }

    fn from_row(row: &HashMap<String, String>) -> Result<Self, RowError> {
        let id = row_value(row, "id")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RowError::new("id", "missing id"))?
            .to_string();

        Ok(Self {
            id,
            date: parse_row_date(row_value(row, "date"))?,
            product: row_value(row, "product").unwrap_or("").to_string(),
            description: row_value(row, "description").unwrap_or("").to_string(),
            location: row_value(row, "location").unwrap_or("").to_string(),
            reference: row_value(row, "reference").unwrap_or("").to_string(),
            cost: parse_row_decimal("cost", row_value(row, "cost"))?,
            urgency: parse_row_rating("urgency", row_value(row, "urgency"), DEFAULT_RATING)?,
            value: parse_row_rating("value", row_value(row, "value"), DEFAULT_RATING)?,
            want: parse_row_rating("want", row_value(row, "want"), DEFAULT_WANT)?,
            price_comp: parse_row_rating(
                "price_comp",
                row_value(row, "price_comp"),
                DEFAULT_RATING,
            )?,
            effect: parse_row_rating("effect", row_value(row, "effect"), DEFAULT_RATING)?,
            justification: row_value(row, "justification").unwrap_or("").to_string(),
            recurrence: row_value(row, "recurrence").unwrap_or("").to_string(),
            overall_score: parse_row_score(row_value(row, "overall_score"))?,
        })
    }

    fn to_row(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("date", self.date.format(DATE_FMT).to_string()),
            ("product", self.product.clone()),
            ("description", self.description.clone()),
            ("location", self.location.clone()),
            ("reference", self.reference.clone()),
            ("cost", fmt_decimal(self.cost)),
            ("urgency", self.urgency.to_string()),
            ("value", self.value.to_string()),
            ("want", self.want.to_string()),
            ("price_comp", self.price_comp.to_string()),
            ("effect", self.effect.to_string()),
            ("justification", self.justification.clone()),
            ("recurrence", self.recurrence.clone()),
            (
                "overall_score",
                self.overall_score.map(fmt_decimal).unwrap_or_default(),
            ),
        ]
    }
}

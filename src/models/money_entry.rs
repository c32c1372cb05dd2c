//! Money movement records
//!
//! A money entry is one income or expense movement. Entries may point at a
//! purchase item via `linked_item_id`; the link is not enforced, and dangling
//! ids are resolved lazily at display time.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    fmt_decimal, parse_row_date, parse_row_decimal, row_value, RowError, RowRecord, DATE_FMT,
};

const HEADERS: &[&str] = &[
    "id",
    "date",
    "entry_type",
    "source_or_destination",
    "amount",
    "notes",
    "linked_item_id",
];

/// A single money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyRecord {
    pub id: String,
    pub date: NaiveDateTime,
    /// `income` or `expense` expected; free text is tolerated
    pub entry_type: String,
    pub source_or_destination: String,
    /// Non-negative; rows store it 2-decimal fixed
    pub amount: f64,
    pub notes: String,
    /// Optional, unenforced reference to an `ItemRecord` id
    pub linked_item_id: Option<String>,
}

impl MoneyRecord {
    /// Create a new entry with a fresh id
    pub fn new(
        date: NaiveDateTime,
        entry_type: impl Into<String>,
        source_or_destination: impl Into<String>,
        amount: f64,
        notes: impl Into<String>,
        linked_item_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            entry_type: entry_type.into(),
            source_or_destination: source_or_destination.into(),
            amount,
            notes: notes.into(),
            linked_item_id,
        }
    }

    pub fn is_income(&self) -> bool {
        self.entry_type.eq_ignore_ascii_case("income")
    }

    pub fn is_expense(&self) -> bool {
        self.entry_type.eq_ignore_ascii_case("expense")
    }
}

impl RowRecord for MoneyRecord {
    const KIND: &'static str = "money entry";

    fn headers() -> &'static [&'static str] {
        HEADERS
    }

    fn required_columns() -> &'static [&'static str] {
        HEADERS
    }

    fn from_row(row: &HashMap<String, String>) -> Result<Self, RowError> {
        let id = row_value(row, "id")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RowError::new("id", "missing id"))?
            .to_string();

        let linked_item_id = row_value(row, "linked_item_id")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        Ok(Self {
            id,
            date: parse_row_date(row_value(row, "date"))?,
            entry_type: row_value(row, "entry_type").unwrap_or("income").to_string(),
            source_or_destination: row_value(row, "source_or_destination")
                .unwrap_or("")
                .to_string(),
            amount: parse_row_decimal("amount", row_value(row, "amount"))?,
            notes: row_value(row, "notes").unwrap_or("").to_string(),
            linked_item_id,
        })
    }

    fn to_row(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("date", self.date.format(DATE_FMT).to_string()),
            ("entry_type", self.entry_type.clone()),
            (
                "source_or_destination",
                self.source_or_destination.clone(),
            ),
            ("amount", fmt_decimal(self.amount)),
            ("notes", self.notes.clone()),
            (
                "linked_item_id",
                self.linked_item_id.clone().unwrap_or_default(),
            ),
        ]
    }
}

/// Income/expense totals over a set of entries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoneySummary {
    pub income: f64,
    pub expenses: f64,
}

impl MoneySummary {
    /// Total up a collection; entry types other than income/expense are
    /// counted in neither bucket.
    pub fn of(entries: &[MoneyRecord]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            if entry.is_income() {
                summary.income += entry.amount;
            } else if entry.is_expense() {
                summary.expenses += entry.amount;
            }
        }
        summary
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expenses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample_entry() -> MoneyRecord {
        MoneyRecord::new(
            sample_date(),
            "expense",
            "Hardware store",
            79.99,
            "shelf brackets",
            Some("b9c1d6a0-0000-0000-0000-000000000001".into()),
        )
    }

    fn row_from(entry: &MoneyRecord) -> HashMap<String, String> {
        entry
            .to_row()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_row_round_trip() {
        let entry = sample_entry();
        let parsed = MoneyRecord::from_row(&row_from(&entry)).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_empty_link_reads_as_none() {
        let mut entry = sample_entry();
        entry.linked_item_id = None;
        let row = row_from(&entry);
        assert_eq!(row["linked_item_id"], "");
        let parsed = MoneyRecord::from_row(&row).unwrap();
        assert_eq!(parsed.linked_item_id, None);
    }

    #[test]
    fn test_missing_entry_type_defaults_to_income() {
        let mut row = row_from(&sample_entry());
        row.remove("entry_type");
        let parsed = MoneyRecord::from_row(&row).unwrap();
        assert_eq!(parsed.entry_type, "income");
    }

    #[test]
    fn test_free_text_entry_type_tolerated() {
        let mut row = row_from(&sample_entry());
        row.insert("entry_type".into(), "Transfer".into());
        let parsed = MoneyRecord::from_row(&row).unwrap();
        assert_eq!(parsed.entry_type, "Transfer");
        assert!(!parsed.is_income());
        assert!(!parsed.is_expense());
    }

    #[test]
    fn test_negative_amount_is_an_error() {
        let mut row = row_from(&sample_entry());
        row.insert("amount".into(), "-5".into());
        assert!(MoneyRecord::from_row(&row).is_err());
    }

    #[test]
    fn test_summary_totals() {
        let mk = |entry_type: &str, amount: f64| {
            MoneyRecord::new(sample_date(), entry_type, "src", amount, "", None)
        };
        let entries = vec![
            mk("income", 1200.0),
            mk("Income", 300.0),
            mk("expense", 79.99),
            mk("transfer", 50.0),
        ];
        let summary = MoneySummary::of(&entries);
        assert_eq!(summary.income, 1500.0);
        assert_eq!(summary.expenses, 79.99);
        assert!((summary.balance() - 1420.01).abs() < 1e-9);
    }
}

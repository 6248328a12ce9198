//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - shared between the loader thread and the UI
//! - reused by the one-shot CLI commands (`show`, `export`)
//! - exercised directly in unit tests

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One entry of the category registry: a named data source.
///
/// The registry is fixed configuration (see `crate::config`); categories are
/// not user-editable at runtime. `file` is the file name of the category's
/// JSON document, resolved against the configured data location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    pub label: &'static str,
    pub file: &'static str,
}

/// Relative lookback window, anchored at the dataset's most recent date.
///
/// `All` is the pass-through member: it leaves the dataset unfiltered and is
/// also where unrecognized range keys land (see [`RangeToken::from_key`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum RangeToken {
    #[value(name = "1m")]
    #[serde(rename = "1M")]
    M1,
    #[value(name = "6m")]
    #[serde(rename = "6M")]
    M6,
    #[value(name = "1y")]
    #[serde(rename = "1Y")]
    Y1,
    #[value(name = "ytd")]
    #[serde(rename = "YTD")]
    Ytd,
    #[value(name = "2y")]
    #[serde(rename = "2Y")]
    Y2,
    #[value(name = "5y")]
    #[serde(rename = "5Y")]
    Y5,
    #[value(name = "all")]
    #[serde(rename = "all")]
    All,
}

impl RangeToken {
    /// All tokens in display/cycling order.
    pub const ALL: [RangeToken; 7] = [
        RangeToken::M1,
        RangeToken::M6,
        RangeToken::Y1,
        RangeToken::Ytd,
        RangeToken::Y2,
        RangeToken::Y5,
        RangeToken::All,
    ];

    /// The stable key used in data/config contexts.
    pub fn key(self) -> &'static str {
        match self {
            RangeToken::M1 => "1M",
            RangeToken::M6 => "6M",
            RangeToken::Y1 => "1Y",
            RangeToken::Ytd => "YTD",
            RangeToken::Y2 => "2Y",
            RangeToken::Y5 => "5Y",
            RangeToken::All => "All",
        }
    }

    /// Resolve a range key.
    ///
    /// Unrecognized keys degrade to `All`, which `apply_range` treats as
    /// identity. Matching is case-insensitive.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_uppercase().as_str() {
            "1M" => RangeToken::M1,
            "6M" => RangeToken::M6,
            "1Y" => RangeToken::Y1,
            "YTD" => RangeToken::Ytd,
            "2Y" => RangeToken::Y2,
            "5Y" => RangeToken::Y5,
            _ => RangeToken::All,
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A single dated observation row.
///
/// Metric fields keep the key order of the source JSON object; the selectable
/// series list is derived from that order. A `None` value (JSON `null`, or a
/// non-numeric scalar) means "no observation on this date" and is rendered as
/// a blank cell / a gap in the chart line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    fields: Vec<(String, Option<f64>)>,
}

impl Record {
    pub fn new(date: NaiveDate, fields: Vec<(String, Option<f64>)>) -> Self {
        Self { date, fields }
    }

    /// Metric field names in first-seen order (`date` is not a field).
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// The observed value for `name`, or `None` when absent or null.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| *v)
    }

    pub fn fields(&self) -> &[(String, Option<f64>)] {
        &self.fields
    }
}

/// A loaded category dataset.
///
/// Invariant: `records` is sorted ascending by date (stable sort at load time;
/// ties keep their source order). `columns` is the column set of the first
/// record. Datasets are replaced wholesale on every load, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub columns: Vec<String>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The anchor date for range filtering (the most recent observation).
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_key_round_trip() {
        for token in RangeToken::ALL {
            assert_eq!(RangeToken::from_key(token.key()), token);
        }
    }

    #[test]
    fn unknown_range_key_degrades_to_all() {
        assert_eq!(RangeToken::from_key("10Y"), RangeToken::All);
        assert_eq!(RangeToken::from_key(""), RangeToken::All);
        assert_eq!(RangeToken::from_key("ytd "), RangeToken::Ytd);
    }

    #[test]
    fn range_cycling_covers_all_tokens() {
        let mut token = RangeToken::M1;
        for _ in 0..RangeToken::ALL.len() {
            token = token.next();
        }
        assert_eq!(token, RangeToken::M1);
        assert_eq!(RangeToken::M1.prev(), RangeToken::All);
    }

    #[test]
    fn record_value_lookup() {
        let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let record = Record::new(
            date,
            vec![
                ("CPI_headline".to_string(), Some(314.69)),
                ("CPI_core".to_string(), None),
            ],
        );
        assert_eq!(record.value("CPI_headline"), Some(314.69));
        assert_eq!(record.value("CPI_core"), None);
        assert_eq!(record.value("missing"), None);
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["CPI_headline", "CPI_core"]);
    }
}

//! Selectable series derivation and sticky selection.

use crate::domain::Record;

/// The column set of a dataset: the metric field names of its first record,
/// in first-seen order.
///
/// Datasets produced by the crawler share one field set across records, so
/// the first record is authoritative; a field that is null there still names
/// a column.
pub fn column_set(records: &[Record]) -> Vec<String> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    first.field_names().map(str::to_string).collect()
}

/// Carry the user's series choice across a dataset reload.
///
/// The previous selection survives only while it is still a member of the new
/// column set; otherwise the selection falls back to the first column, or to
/// `None` when there are no columns. Re-derived on every load.
pub fn select_series(previous: Option<&str>, columns: &[String]) -> Option<String> {
    if let Some(prev) = previous {
        if columns.iter().any(|c| c == prev) {
            return Some(prev.to_string());
        }
    }
    columns.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(fields: &[(&str, Option<f64>)]) -> Record {
        Record::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            fields
                .iter()
                .map(|(n, v)| (n.to_string(), *v))
                .collect(),
        )
    }

    #[test]
    fn column_set_keeps_first_seen_order() {
        let records = vec![record(&[
            ("CPI_headline", Some(314.0)),
            ("CPI_core", None),
            ("PPI_headline", Some(260.1)),
        ])];
        assert_eq!(
            column_set(&records),
            vec!["CPI_headline", "CPI_core", "PPI_headline"]
        );
    }

    #[test]
    fn column_set_of_empty_dataset_is_empty() {
        assert!(column_set(&[]).is_empty());
    }

    #[test]
    fn selection_survives_when_still_present() {
        let columns = vec!["cpi".to_string(), "core_cpi".to_string()];
        assert_eq!(select_series(Some("cpi"), &columns), Some("cpi".to_string()));
        assert_eq!(
            select_series(Some("core_cpi"), &columns),
            Some("core_cpi".to_string())
        );
    }

    #[test]
    fn selection_falls_back_to_first_column() {
        let columns = vec!["core_cpi".to_string()];
        assert_eq!(
            select_series(Some("cpi"), &columns),
            Some("core_cpi".to_string())
        );
        assert_eq!(select_series(None, &columns), Some("core_cpi".to_string()));
    }

    #[test]
    fn selection_is_none_for_empty_column_set() {
        assert_eq!(select_series(Some("cpi"), &[]), None);
        assert_eq!(select_series(None, &[]), None);
    }
}

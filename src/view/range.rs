//! Lookback range filtering.

use chrono::{Datelike, Months, NaiveDate};

use crate::domain::{RangeToken, Record};

/// Restrict `rows` to the selected lookback window.
///
/// `rows` must be sorted ascending by date (the dataset invariant). The window
/// is anchored at the *last* observation, not at today, so a stale data file
/// still shows a full window. The result is a contiguous suffix of the input;
/// `All` returns the input slice unchanged.
///
/// A record dated exactly on the cutoff is retained. The boundary is
/// deliberately inclusive even though the window is otherwise a strict
/// "after cutoff" test.
pub fn apply_range(rows: &[Record], range: RangeToken) -> &[Record] {
    let Some(last) = rows.last() else {
        return rows;
    };

    let Some(cutoff) = cutoff_date(last.date, range) else {
        return rows;
    };

    let start = rows.partition_point(|r| r.date < cutoff);
    &rows[start..]
}

/// The first date still inside the window, or `None` for `All`.
///
/// Calendar arithmetic clamps to valid dates: one month before March 31 is the
/// last day of February, not an invalid date.
fn cutoff_date(anchor: NaiveDate, range: RangeToken) -> Option<NaiveDate> {
    let months = match range {
        RangeToken::M1 => 1,
        RangeToken::M6 => 6,
        RangeToken::Y1 => 12,
        RangeToken::Y2 => 24,
        RangeToken::Y5 => 60,
        RangeToken::Ytd => return NaiveDate::from_ymd_opt(anchor.year(), 1, 1),
        RangeToken::All => return None,
    };
    anchor.checked_sub_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> Record {
        Record::new(date.parse().unwrap(), Vec::new())
    }

    fn monthly(from: &str, count: usize) -> Vec<Record> {
        let start: NaiveDate = from.parse().unwrap();
        (0..count)
            .map(|i| Record::new(start.checked_add_months(Months::new(i as u32)).unwrap(), Vec::new()))
            .collect()
    }

    #[test]
    fn empty_input_is_returned_unchanged() {
        let rows: Vec<Record> = Vec::new();
        for token in RangeToken::ALL {
            assert!(apply_range(&rows, token).is_empty());
        }
    }

    #[test]
    fn all_is_identity() {
        let rows = monthly("2020-01-01", 24);
        let out = apply_range(&rows, RangeToken::All);
        assert_eq!(out.len(), rows.len());
        // Same slice, not a copy.
        assert!(std::ptr::eq(out.as_ptr(), rows.as_ptr()));
    }

    #[test]
    fn output_is_a_contiguous_suffix() {
        let rows = monthly("2019-06-01", 60);
        for token in RangeToken::ALL {
            let out = apply_range(&rows, token);
            let offset = rows.len() - out.len();
            assert_eq!(out, &rows[offset..]);
        }
    }

    #[test]
    fn one_year_window_is_inclusive_at_the_cutoff() {
        // Anchor 2024-06-01; cutoff 2023-06-01 is itself retained.
        let rows = monthly("2022-01-01", 30);
        let out = apply_range(&rows, RangeToken::Y1);
        assert_eq!(out.first().unwrap().date, "2023-06-01".parse::<NaiveDate>().unwrap());
        assert_eq!(out.len(), 13);
    }

    #[test]
    fn ytd_keeps_exactly_the_anchor_year_from_january_first() {
        let rows = monthly("2023-03-01", 17); // last date 2024-07-01
        let out = apply_range(&rows, RangeToken::Ytd);
        let jan1: NaiveDate = "2024-01-01".parse().unwrap();
        assert!(out.iter().all(|r| r.date >= jan1));
        assert_eq!(out.len(), 7);
        // Every excluded record is from the prior year.
        assert!(rows[..rows.len() - out.len()].iter().all(|r| r.date < jan1));
    }

    #[test]
    fn ytd_on_january_first_anchor_keeps_the_anchor() {
        let rows = vec![record("2023-11-01"), record("2023-12-01"), record("2024-01-01")];
        let out = apply_range(&rows, RangeToken::Ytd);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, "2024-01-01".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn month_subtraction_clamps_at_month_end() {
        // One month before March 31 is February 29 (2024 is a leap year);
        // a February 29 record sits exactly on the cutoff and is retained.
        let rows = vec![
            record("2024-02-28"),
            record("2024-02-29"),
            record("2024-03-15"),
            record("2024-03-31"),
        ];
        let out = apply_range(&rows, RangeToken::M1);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].date, "2024-02-29".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn five_year_window_on_sparse_dates() {
        let rows = vec![
            record("2012-01-01"),
            record("2019-07-01"),
            record("2024-06-01"),
        ];
        let out = apply_range(&rows, RangeToken::Y5);
        assert_eq!(out.len(), 2);
    }
}

//! Chart series preparation.
//!
//! All series and bounds are computed here, outside the render path, so the
//! chart widgets (TUI and ASCII alike) stay render-only and the gap handling
//! is testable.

use chrono::{Datelike, NaiveDate};

use crate::domain::Record;

/// Map a date onto the chart x-axis (days since CE).
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of [`date_to_x`], for tick labels.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Everything a chart needs to draw one series over a date window.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Gap-free polyline segments, each sorted by x.
    pub segments: Vec<Vec<(f64, f64)>>,
    /// Every present observation (segment points, flattened).
    pub points: Vec<(f64, f64)>,
    /// The full date window of `records`, not just of the observations, so
    /// the x-axis matches the selected range.
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Split one series into polyline segments, breaking at missing observations.
///
/// A date with no observation produces a gap between segments; the line is
/// never interpolated across it as if the value were zero.
pub fn series_segments(records: &[Record], column: &str) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for record in records {
        match record.value(column) {
            Some(v) if v.is_finite() => current.push((date_to_x(record.date), v)),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Prepare chart inputs for `column` over `records`.
///
/// Returns `None` when the window holds no observation at all (the chart
/// renders a placeholder message instead of an empty axis box).
pub fn chart_data(records: &[Record], column: &str) -> Option<ChartData> {
    let segments = series_segments(records, column);
    let points: Vec<(f64, f64)> = segments.iter().flatten().copied().collect();
    if points.is_empty() {
        return None;
    }

    let first = records.first()?.date;
    let last = records.last()?.date;
    let mut x0 = date_to_x(first);
    let mut x1 = date_to_x(last);
    if x1 <= x0 {
        // Single-date window; widen so the axis stays drawable.
        x0 -= 1.0;
        x1 += 1.0;
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &points {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if y_max == y_min {
        // A flat series still gets a band around its level.
        let half = y_min.abs().max(1.0) * 0.05;
        y_min -= half;
        y_max += half;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    Some(ChartData {
        segments,
        points,
        x_bounds: [x0, x1],
        y_bounds: [y_min - pad, y_max + pad],
    })
}

/// Short axis label for a date x-value.
pub fn fmt_axis_date(x: f64) -> String {
    x_to_date(x)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

pub fn fmt_axis_value(v: f64) -> String {
    format!("{v:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, value: Option<f64>) -> Record {
        Record::new(date.parse().unwrap(), vec![("m".to_string(), value)])
    }

    #[test]
    fn date_axis_round_trips() {
        let d: NaiveDate = "2024-10-15".parse().unwrap();
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
    }

    #[test]
    fn gaps_split_the_line_into_segments() {
        let records = vec![
            record("2024-01-01", Some(1.0)),
            record("2024-02-01", Some(2.0)),
            record("2024-03-01", None),
            record("2024-04-01", Some(4.0)),
            record("2024-05-01", Some(5.0)),
        ];
        let segments = series_segments(&records, "m");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 2);
    }

    #[test]
    fn leading_and_trailing_gaps_produce_no_empty_segments() {
        let records = vec![
            record("2024-01-01", None),
            record("2024-02-01", Some(2.0)),
            record("2024-03-01", None),
        ];
        let segments = series_segments(&records, "m");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 1);
    }

    #[test]
    fn all_missing_series_has_no_chart() {
        let records = vec![record("2024-01-01", None), record("2024-02-01", None)];
        assert!(chart_data(&records, "m").is_none());
        assert!(chart_data(&[], "m").is_none());
    }

    #[test]
    fn bounds_cover_the_window_and_pad_the_values() {
        let records = vec![
            record("2024-01-01", None),
            record("2024-02-01", Some(2.0)),
            record("2024-03-01", Some(6.0)),
            record("2024-04-01", None),
        ];
        let data = chart_data(&records, "m").unwrap();
        // X bounds span the whole window, including the missing edges.
        assert_eq!(data.x_bounds[0], date_to_x("2024-01-01".parse().unwrap()));
        assert_eq!(data.x_bounds[1], date_to_x("2024-04-01".parse().unwrap()));
        assert!(data.y_bounds[0] < 2.0);
        assert!(data.y_bounds[1] > 6.0);
    }

    #[test]
    fn flat_series_keeps_its_level_inside_bounds() {
        let records = vec![
            record("2024-01-01", Some(5.0)),
            record("2024-02-01", Some(5.0)),
        ];
        let data = chart_data(&records, "m").unwrap();
        assert!(data.y_bounds[0] < 5.0 && 5.0 < data.y_bounds[1]);
    }
}

//! Plain-text rendering of dataset summaries and table pages.

use crate::domain::{Category, Dataset, RangeToken};
use crate::view::table::TablePage;

/// One-paragraph dataset header for `mdash show`.
pub fn format_dataset_summary(
    category: &Category,
    dataset: &Dataset,
    range: RangeToken,
    windowed_rows: usize,
    origin: &str,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== mdash - {} ===\n", category.label));
    out.push_str(&format!("Source: {origin}\n"));

    match (dataset.first_date(), dataset.last_date()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Rows: {} ({first} to {last})\n",
                dataset.len()
            ));
        }
        _ => out.push_str("Rows: 0 (empty dataset)\n"),
    }

    out.push_str(&format!(
        "Series: {}\n",
        if dataset.columns.is_empty() {
            "-".to_string()
        } else {
            dataset.columns.join(", ")
        }
    ));
    out.push_str(&format!(
        "Range: {} ({windowed_rows} rows in window)",
        range.key()
    ));

    out
}

/// Render one table page with a header row and pagination footer.
///
/// Zero matching rows prints a "no rows match" notice for a non-empty query
/// and just the footer otherwise.
pub fn format_table(page: &TablePage, columns: &[String], query: &str) -> String {
    // Column widths: headers vs. the widest cell on this page.
    let mut widths: Vec<usize> = Vec::with_capacity(columns.len() + 1);
    widths.push("date".len().max(10));
    for (i, name) in columns.iter().enumerate() {
        let cell_max = page
            .rows
            .iter()
            .map(|r| r.cells.get(i).map_or(0, String::len))
            .max()
            .unwrap_or(0);
        widths.push(name.len().max(cell_max));
    }

    let mut out = String::new();

    let mut header: Vec<String> = vec![format!("{:<width$}", "date", width = widths[0])];
    for (i, name) in columns.iter().enumerate() {
        header.push(format!("{:>width$}", name, width = widths[i + 1]));
    }
    out.push_str(&header.join("  "));
    out.push('\n');

    for row in &page.rows {
        let mut cells: Vec<String> = vec![format!("{:<width$}", row.date, width = widths[0])];
        for (i, cell) in row.cells.iter().enumerate() {
            cells.push(format!("{:>width$}", cell, width = widths[i + 1]));
        }
        out.push_str(&cells.join("  "));
        out.push('\n');
    }

    if page.rows.is_empty() && !query.trim().is_empty() {
        out.push_str("No rows match your search.\n");
    }

    out.push_str(&format!(
        "page {}/{} | {} rows | {} per page",
        page.page, page.total_pages, page.total_rows, page.page_size
    ));
    if !query.trim().is_empty() {
        out.push_str(&format!(" | query: {:?}", query.trim()));
    }

    out
}

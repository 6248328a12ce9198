//! Debug bundle writer for inspecting loaded datasets and view state.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{Category, Dataset, RangeToken};
use crate::error::AppError;
use crate::view::range::apply_range;
use crate::view::table::format_value;

/// Everything worth dumping when the dashboard misbehaves.
pub struct DebugSnapshot<'a> {
    pub category: &'a Category,
    pub dataset: &'a Dataset,
    pub range: RangeToken,
    pub series: Option<&'a str>,
    pub query: &'a str,
    pub page: usize,
    pub page_size: usize,
}

/// Write a bundle under `debug/` and return its path.
pub fn write_debug_bundle(snapshot: &DebugSnapshot) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), snapshot)
}

pub fn write_debug_bundle_in(dir: &Path, snapshot: &DebugSnapshot) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::data(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("mdash_debug_{}_{ts}.md", snapshot.category.key));

    let mut out = String::new();
    out.push_str("# mdash debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- category: {}\n", snapshot.category.key));
    out.push_str(&format!("- range: {}\n", snapshot.range.key()));
    out.push_str(&format!("- series: {}\n", snapshot.series.unwrap_or("-")));
    out.push_str(&format!("- query: {:?}\n", snapshot.query));
    out.push_str(&format!(
        "- page: {} ({} per page)\n",
        snapshot.page, snapshot.page_size
    ));

    let dataset = snapshot.dataset;
    out.push_str("\n## Dataset\n");
    out.push_str(&format!("- rows: {}\n", dataset.len()));
    if let (Some(first), Some(last)) = (dataset.first_date(), dataset.last_date()) {
        out.push_str(&format!("- span: {first} to {last}\n"));
    }
    out.push_str(&format!("- columns: {}\n", dataset.columns.join(", ")));
    out.push_str(&format!(
        "- rows in {} window: {}\n",
        snapshot.range.key(),
        apply_range(&dataset.records, snapshot.range).len()
    ));

    out.push_str("\n## Head/tail\n");
    write_rows_table(&mut out, dataset, 5);

    let mut file =
        File::create(&path).map_err(|e| AppError::data(format!("Failed to create debug file: {e}")))?;
    file.write_all(out.as_bytes())
        .map_err(|e| AppError::data(format!("Failed to write debug file: {e}")))?;

    Ok(path)
}

fn write_rows_table(out: &mut String, dataset: &Dataset, edge: usize) {
    out.push_str(&format!("| date | {} |\n", dataset.columns.join(" | ")));
    out.push_str(&format!("| - |{}\n", " - |".repeat(dataset.columns.len())));

    let n = dataset.len();
    let row_line = |i: usize| -> String {
        let record = &dataset.records[i];
        let cells: Vec<String> = dataset
            .columns
            .iter()
            .map(|c| record.value(c).map(format_value).unwrap_or_default())
            .collect();
        format!("| {} | {} |\n", record.date, cells.join(" | "))
    };

    if n <= edge * 2 {
        for i in 0..n {
            out.push_str(&row_line(i));
        }
        return;
    }
    for i in 0..edge {
        out.push_str(&row_line(i));
    }
    out.push_str("| ... |\n");
    for i in n - edge..n {
        out.push_str(&row_line(i));
    }
}

//! Shared load pipeline used by the loader thread and the one-shot CLI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> parse -> sort -> derive columns
//!
//! The TUI and the CLI commands can then focus on presentation.

use crate::data::DataSource;
use crate::domain::{Category, Dataset};
use crate::error::AppError;
use crate::view::series::column_set;

/// Fetch and publish: raw records in, dataset out.
///
/// The sort is stable and ascending by date, so same-date records keep their
/// document order. The column set is derived from the first record *after*
/// sorting (the earliest observation).
pub fn load_dataset(source: &dyn DataSource, category: &Category) -> Result<Dataset, AppError> {
    let mut records = source.fetch(category)?;
    records.sort_by_key(|r| r.date);
    let columns = column_set(&records);
    Ok(Dataset { records, columns })
}

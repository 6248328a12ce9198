//! Table view model: search, ordering, pagination.
//!
//! `build_page` is a pure function from (records, columns, request) to one
//! displayable page; `TableControls` holds the interactive state and the
//! reset rules. Keeping the two apart makes every contract testable without a
//! terminal.

use chrono::NaiveDate;

use crate::domain::Record;

/// Selectable page sizes, in cycling order.
pub const PAGE_SIZES: [usize; 4] = [25, 50, 100, 250];

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Inputs for one table page.
#[derive(Debug, Clone, Copy)]
pub struct TableRequest<'a> {
    /// Free-text search; trimmed and lowercased before matching. Empty or
    /// whitespace-only matches everything.
    pub query: &'a str,
    /// 1-based requested page; clamped into `[1, total_pages]`.
    pub page: usize,
    pub page_size: usize,
}

/// One rendered table row: the date plus one cell per column, blank when the
/// observation is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub date: NaiveDate,
    pub cells: Vec<String>,
}

/// One page of rows plus pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    /// The page actually returned (after clamping).
    pub page: usize,
    /// Always at least 1, even with zero matching rows.
    pub total_pages: usize,
    /// Matching rows across all pages.
    pub total_rows: usize,
    pub page_size: usize,
}

/// Build one table page.
///
/// Rows are presented in reverse dataset order (most recent date first),
/// regardless of the ascending order the chart uses. Zero matching rows is a
/// valid page, not an error.
pub fn build_page(records: &[Record], columns: &[String], req: &TableRequest) -> TablePage {
    let page_size = req.page_size.max(1);
    let query = req.query.trim().to_lowercase();

    let filtered: Vec<&Record> = records
        .iter()
        .rev()
        .filter(|r| query.is_empty() || matches_query(r, columns, &query))
        .collect();

    let total_rows = filtered.len();
    let total_pages = total_rows.div_ceil(page_size).max(1);
    let page = req.page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_rows);
    let rows = filtered[start..end]
        .iter()
        .map(|r| TableRow {
            date: r.date,
            cells: columns
                .iter()
                .map(|c| r.value(c).map(format_value).unwrap_or_default())
                .collect(),
        })
        .collect();

    TablePage {
        rows,
        page,
        total_pages,
        total_rows,
        page_size,
    }
}

/// Substring match against the date or any non-null column value.
///
/// `query` must already be trimmed and lowercased. Missing observations are
/// skipped, not matched.
fn matches_query(record: &Record, columns: &[String], query: &str) -> bool {
    if record.date.to_string().to_lowercase().contains(query) {
        return true;
    }
    columns.iter().any(|c| {
        record
            .value(c)
            .is_some_and(|v| format_value(v).to_lowercase().contains(query))
    })
}

/// Stringify an observation the way it is displayed and searched.
pub fn format_value(v: f64) -> String {
    v.to_string()
}

/// Interactive table state: query, page, page size.
///
/// Changing the query or the page size resets the page back to 1. Page
/// navigation clamps against the total computed by the last `build_page`.
#[derive(Debug, Clone)]
pub struct TableControls {
    pub query: String,
    pub page: usize,
    page_size_index: usize,
}

impl Default for TableControls {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size_index: PAGE_SIZES
                .iter()
                .position(|&s| s == DEFAULT_PAGE_SIZE)
                .unwrap_or(0),
        }
    }
}

impl TableControls {
    pub fn page_size(&self) -> usize {
        PAGE_SIZES[self.page_size_index]
    }

    pub fn request(&self) -> TableRequest<'_> {
        TableRequest {
            query: &self.query,
            page: self.page,
            page_size: self.page_size(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn next_page_size(&mut self) {
        self.page_size_index = (self.page_size_index + 1) % PAGE_SIZES.len();
        self.page = 1;
    }

    pub fn prev_page_size(&mut self) {
        self.page_size_index = (self.page_size_index + PAGE_SIZES.len() - 1) % PAGE_SIZES.len();
        self.page = 1;
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Fresh state for a newly published dataset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

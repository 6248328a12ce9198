//! Data sources and the background loader.
//!
//! - HTTP retrieval of the pre-generated category files (`http`)
//! - deterministic synthetic datasets for offline use (`sample`)
//! - the background load worker with its staleness guard (`loader`)

pub mod http;
pub mod loader;
pub mod sample;

pub use http::HttpSource;
pub use loader::{LoadOutcome, Loader};
pub use sample::SampleSource;

use crate::domain::{Category, Record};
use crate::error::AppError;

/// The fetch seam between the dashboard and wherever its data lives.
///
/// Implementations are used both directly (one-shot CLI commands) and from the
/// loader's worker thread, hence `Send`.
pub trait DataSource: Send {
    fn fetch(&self, category: &Category) -> Result<Vec<Record>, AppError>;

    /// Human-readable origin for status lines and reports.
    fn describe(&self) -> String;
}

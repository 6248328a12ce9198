//! Formatted terminal output for the one-shot commands.
//!
//! We keep formatting code in one place so:
//! - the view-model code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;

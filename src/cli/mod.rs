//! Command-line parsing for the macro dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data and view-model code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::RangeToken;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mdash", version, about = "Macro time-series dashboard (FRED crawler output)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(ViewArgs),
    /// Load one category and print its summary and table page to stdout.
    Show(ShowArgs),
    /// Export one category's range-filtered rows to CSV.
    Export(ExportArgs),
}

/// Options shared by every front-end: which data, from where.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Category to open (registry key, e.g. Inflation, Labor, Rates).
    #[arg(short = 'c', long, default_value = "Inflation")]
    pub category: String,

    /// Lookback range.
    #[arg(short = 'r', long, value_enum, default_value_t = RangeToken::Y1)]
    pub range: RangeToken,

    /// Base URL of the data file host (overrides MDASH_DATA_URL).
    #[arg(long, value_name = "URL")]
    pub data_url: Option<String>,

    /// Use deterministic synthetic data instead of fetching.
    #[arg(long)]
    pub offline: bool,

    /// Seed for synthetic data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for the one-shot `show` command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Series to chart (defaults to the category's first column).
    #[arg(short = 's', long)]
    pub series: Option<String>,

    /// Table search query (matches dates and values as substrings).
    #[arg(short = 'q', long, default_value = "")]
    pub query: String,

    /// 1-based table page.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (25, 50, 100 or 250).
    #[arg(long, default_value_t = 50)]
    pub page_size: usize,

    /// Render an ASCII chart of the selected series above the table.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for the CSV export.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,
}

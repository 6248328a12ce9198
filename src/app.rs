//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data source (HTTP host or synthetic)
//! - dispatches to the TUI or the one-shot commands
//! - writes optional exports

use std::fs::File;
use std::io::Write;

use clap::Parser;

use crate::cli::{Command, ExportArgs, ShowArgs, ViewArgs};
use crate::data::{DataSource, HttpSource, SampleSource};
use crate::domain::Category;
use crate::error::AppError;
use crate::view::series::select_series;
use crate::view::table::{build_page, format_value, TableRequest, PAGE_SIZES};

pub mod pipeline;

/// Entry point for the `mdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mdash` and `mdash -c Labor` to behave like `mdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Show(args) => handle_show(args),
        Command::Export(args) => handle_export(args),
    }
}

/// Resolve the data source from the shared view options.
pub fn source_from_args(args: &ViewArgs) -> Result<Box<dyn DataSource>, AppError> {
    if args.offline {
        return Ok(Box::new(SampleSource::new(args.seed)));
    }
    if let Some(url) = &args.data_url {
        return Ok(Box::new(HttpSource::new(url.clone())));
    }
    Ok(Box::new(HttpSource::from_env()?))
}

/// Resolve a registry key to its category, with a helpful error.
pub fn resolve_category(key: &str) -> Result<&'static Category, AppError> {
    crate::config::category_by_key(key).ok_or_else(|| {
        let known: Vec<&str> = crate::config::CATEGORIES.iter().map(|c| c.key).collect();
        AppError::config(format!(
            "Unknown category '{key}'. Known categories: {}.",
            known.join(", ")
        ))
    })
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    if !PAGE_SIZES.contains(&args.page_size) {
        return Err(AppError::config(format!(
            "Invalid page size {}. Choose one of {:?}.",
            args.page_size, PAGE_SIZES
        )));
    }

    let category = resolve_category(&args.view.category)?;
    let source = source_from_args(&args.view)?;
    let dataset = pipeline::load_dataset(source.as_ref(), category)?;
    let windowed = crate::view::range::apply_range(&dataset.records, args.view.range);

    let series = match &args.series {
        Some(name) => {
            if !dataset.columns.iter().any(|c| c == name) {
                return Err(AppError::config(format!(
                    "Series '{name}' is not in this category. Available: {}.",
                    dataset.columns.join(", ")
                )));
            }
            Some(name.clone())
        }
        None => select_series(None, &dataset.columns),
    };

    println!(
        "{}",
        crate::report::format_dataset_summary(
            category,
            &dataset,
            args.view.range,
            windowed.len(),
            &source.describe(),
        )
    );

    if args.plot {
        if let Some(series) = &series {
            let plot =
                crate::plot::render_ascii_chart(windowed, series, args.width, args.height);
            println!("{plot}");
        }
    }

    let page = build_page(
        windowed,
        &dataset.columns,
        &TableRequest {
            query: &args.query,
            page: args.page,
            page_size: args.page_size,
        },
    );
    println!(
        "{}",
        crate::report::format_table(&page, &dataset.columns, &args.query)
    );

    Ok(())
}

/// Write the range-filtered rows to CSV, chronologically ascending, with
/// blank cells for missing observations.
fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let category = resolve_category(&args.view.category)?;
    let source = source_from_args(&args.view)?;
    let dataset = pipeline::load_dataset(source.as_ref(), category)?;
    let windowed = crate::view::range::apply_range(&dataset.records, args.view.range);

    let mut file = File::create(&args.out).map_err(|e| {
        AppError::config(format!(
            "Failed to create export CSV '{}': {e}",
            args.out.display()
        ))
    })?;

    let mut header = vec!["date".to_string()];
    header.extend(dataset.columns.iter().cloned());
    writeln!(file, "{}", header.join(","))
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for record in windowed {
        let mut cells = vec![record.date.to_string()];
        cells.extend(
            dataset
                .columns
                .iter()
                .map(|c| record.value(c).map(format_value).unwrap_or_default()),
        );
        writeln!(file, "{}", cells.join(","))
            .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    println!(
        "Wrote {} rows ({} range) to {}",
        windowed.len(),
        args.view.range.key(),
        args.out.display()
    );
    Ok(())
}

/// Rewrite argv so `mdash` defaults to `mdash tui`.
///
/// Rules:
/// - `mdash`                      -> `mdash tui`
/// - `mdash -c Labor ...`         -> `mdash tui -c Labor ...`
/// - `mdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["mdash"])), args(&["mdash", "tui"]));
        assert_eq!(
            rewrite_args(args(&["mdash", "-c", "Labor"])),
            args(&["mdash", "tui", "-c", "Labor"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["mdash", "show", "-c", "Rates"])),
            args(&["mdash", "show", "-c", "Rates"])
        );
        assert_eq!(rewrite_args(args(&["mdash", "--help"])), args(&["mdash", "--help"]));
    }

    #[test]
    fn unknown_category_is_a_config_error() {
        let err = resolve_category("Housing").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

//! Utility functions for the playground.
//!
//! This module provides logging setup and formatting helpers for
//! registries and pipeline reports.

use flexi_logger::{Logger, LoggerHandle};

use common_display::truncate_string;
use mosaic_core::{match_any_array, AnyArray};
use mosaic_engine::metrics::format_metrics;
use mosaic_engine::PipelineReport;

/// Start logging to stderr. `RUST_LOG` overrides the default level.
///
/// Returns `None` if the logger could not be started; the runner keeps
/// going without logs in that case.
pub fn init_logging(verbose: bool) -> Option<LoggerHandle> {
    let level = if verbose { "debug" } else { "warn" };
    match Logger::try_with_env_or_str(level).and_then(|logger| logger.start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("failed to start logger: {e}");
            None
        }
    }
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(60));
}

/// Print the diagnostics, per-filter timing and outcome of a run.
pub fn print_report(report: &PipelineReport) {
    if report.diagnostics.is_empty() {
        println!("(no diagnostics)");
    }
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    print_divider();
    print!("{}", format_metrics(&report.metrics));
    print_divider();
    println!(
        "Filters completed: {} of {}",
        report.executed,
        report.states.len()
    );
    println!("Result code: {}", report.error_code());
    println!("Elapsed: {:?}", report.elapsed);
}

/// Format up to `max_tuples` tuples of `array`, one per line.
pub fn format_array_preview(array: &AnyArray, max_tuples: usize) -> String {
    let comps = array.num_components();
    let shown = array.num_tuples().min(max_tuples);
    let mut output = format!("{}\n", array.describe());
    for tuple in 0..shown {
        let values: Vec<String> = match_any_array!(array, a => a
            .tuple(tuple)
            .iter()
            .map(|v| format!("{v:?}"))
            .collect());
        output.push_str(&format!(
            "  [{tuple:>4}] {}\n",
            truncate_string(&values.join(", "), 56)
        ));
    }
    if array.num_tuples() > shown {
        output.push_str(&format!(
            "  ... ({} more tuples of {comps} components)\n",
            array.num_tuples() - shown
        ));
    }
    output
}

/// Print a preview of `array`.
pub fn print_array_preview(array: &AnyArray, max_tuples: usize) {
    print!("{}", format_array_preview(array, max_tuples));
}

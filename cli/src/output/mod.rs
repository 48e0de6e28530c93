//! Terminal output for trace reports
//!
//! Colors are only emitted when stdout is a terminal.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::IsTerminal;
use tooltrace_core::trace::ReportFormatter;
use tooltrace_core::TraceReport;

/// Formatter matching the current stdout
pub fn stdout_formatter() -> ReportFormatter {
    if std::io::stdout().is_terminal() {
        ReportFormatter::new()
    } else {
        ReportFormatter::plain()
    }
}

/// Print a report in human-readable form
pub fn print_report(report: &TraceReport) {
    println!("{}", stdout_formatter().format_report(report));
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

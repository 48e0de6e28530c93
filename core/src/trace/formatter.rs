//! Terminal rendering of trace reports
//!
//! Each step is shown with a colored status dot followed by its captured
//! input/output or error, in the same layout used for tool status lines.

use crate::trace::{Step, StepStatus, TraceReport, TraceStatus};

// ANSI color codes
pub const GRAY: &str = "\x1b[90m"; // Gray text for orders and timings
pub const GREEN: &str = "\x1b[92m"; // Green text for success status
pub const RED: &str = "\x1b[91m"; // Red text for error status
pub const RESET: &str = "\x1b[0m";

const PREVIEW_WIDTH: usize = 100;

/// Formatter for trace reports
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    color: bool,
}

impl ReportFormatter {
    /// Create a formatter that emits ANSI colors
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Create a formatter for plain text output
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Format a whole report: header line, then one block per step
    pub fn format_report(&self, report: &TraceReport) -> String {
        let mut result = self.format_header(report);

        for step in &report.steps {
            result.push('\n');
            result.push_str(&self.format_step(step));
        }

        if let Some(summary) = &report.error_summary {
            result.push_str(&format!("\n{}", self.paint(RED, &format!("✗ {}", summary))));
        }

        result
    }

    /// Format the report header
    pub fn format_header(&self, report: &TraceReport) -> String {
        let color = match report.status {
            TraceStatus::Completed => GREEN,
            TraceStatus::Failed => RED,
        };

        format!(
            "{} {} [{}] {} steps in {}",
            self.paint(color, "⏺"),
            report.name,
            report.status.as_str(),
            report.total_steps,
            self.paint(GRAY, &format!("{:.2}ms", report.total_duration_ms)),
        )
    }

    /// Format one step with its status dot and captured data
    pub fn format_step(&self, step: &Step) -> String {
        let color = match step.status {
            StepStatus::Ok => GREEN,
            StepStatus::Failed => RED,
        };

        let mut result = format!(
            "  {} {} {} {}",
            self.paint(GRAY, &format!("{:>3}.", step.order)),
            self.paint(color, "⏺"),
            step.qualified_name(),
            self.paint(GRAY, &format!("({:.2}ms)", step.duration_ms)),
        );

        if let Some(input) = &step.input {
            result.push_str(&format!("\n       ⎿  in:  {}", preview(input)));
        }
        if let Some(output) = &step.output {
            result.push_str(&format!("\n       ⎿  out: {}", preview(output)));
        }
        if let Some(error) = &step.error {
            result.push_str(&format!("\n       ⎿  {}", self.paint(RED, error)));
        }

        result
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact one-line rendering of a captured value
fn preview(value: &serde_json::Value) -> String {
    let text = value.to_string();
    if text.chars().count() > PREVIEW_WIDTH {
        let cut: String = text.chars().take(PREVIEW_WIDTH - 3).collect();
        format!("{}...", cut)
    } else {
        text
    }
}

//! Show command: render a saved trace report

use crate::output::{print_json, print_report};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::Path;
use tooltrace_core::{TraceReport, EXECUTION_TRACE_KEY};
use tracing::debug;

/// Render the report stored in `path`
///
/// The file may hold a bare report or response data carrying one under the
/// reserved trace key.
pub fn show_command(path: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file: {}", path.display()))?;
    let report = parse_report(&content)
        .with_context(|| format!("Failed to parse report file: {}", path.display()))?;

    if json {
        print_json(&report)
    } else {
        print_report(&report);
        Ok(())
    }
}

/// Parse a report, unwrapping it from response data if needed
pub fn parse_report(content: &str) -> Result<TraceReport> {
    let value: Value = serde_json::from_str(content)?;
    let value = match value {
        Value::Object(mut object) if object.contains_key(EXECUTION_TRACE_KEY) => {
            debug!("Found embedded trace under {}", EXECUTION_TRACE_KEY);
            object
                .remove(EXECUTION_TRACE_KEY)
                .ok_or_else(|| anyhow!("Missing {}", EXECUTION_TRACE_KEY))?
        }
        other => other,
    };

    Ok(TraceReport::from_json(&value.to_string())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report_json() -> Value {
        json!({
            "trace_id": "5d3c1bb0-1f4e-4b8e-9a39-4f0a8b6f2c11",
            "name": "WeatherTool",
            "started_at": "2024-05-01T12:00:00Z",
            "completed_at": "2024-05-01T12:00:00.004Z",
            "total_duration_ms": 4.0,
            "status": "completed",
            "total_steps": 1,
            "steps": [{
                "order": 1,
                "owner": "WeatherTool",
                "method": "fetch_forecast",
                "status": "ok",
                "input": "Recife",
                "duration_ms": 3.5
            }]
        })
    }

    #[test]
    fn test_parse_bare_report() {
        let report = parse_report(&report_json().to_string()).unwrap();
        assert_eq!(report.name, "WeatherTool");
        assert_eq!(report.steps[0].method, "fetch_forecast");
    }

    #[test]
    fn test_parse_embedded_report() {
        let data = json!({"city": "Recife", EXECUTION_TRACE_KEY: report_json()});
        let report = parse_report(&data.to_string()).unwrap();
        assert_eq!(report.total_steps, 1);
    }

    #[test]
    fn test_parse_rejects_bad_numbering() {
        let mut value = report_json();
        value["steps"][0]["order"] = json!(2);
        assert!(parse_report(&value.to_string()).is_err());
    }
}

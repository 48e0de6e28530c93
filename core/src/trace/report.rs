//! Trace report assembled at the end of an invocation

use crate::error::TraceError;
use crate::trace::capture::summarize_error;
use crate::trace::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key under which legacy consumers find the report inside response data
pub const EXECUTION_TRACE_KEY: &str = "_execution_trace";

/// Overall status of a traced invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    Completed,
    Failed,
}

impl TraceStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceStatus::Completed => "completed",
            TraceStatus::Failed => "failed",
        }
    }
}

/// How the outer invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The entry point returned normally
    Completed,
    /// The entry point failed; carries the error summary
    Failed(String),
}

impl Outcome {
    /// Derive the outcome from the entry point's result
    pub fn of<T, E: std::fmt::Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Outcome::Completed,
            Err(e) => Outcome::Failed(summarize_error(e)),
        }
    }

    /// Failure summary, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Completed => None,
            Outcome::Failed(summary) => Some(summary),
        }
    }
}

/// Immutable record of one traced invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceReport {
    /// Unique identifier for this report
    pub trace_id: Uuid,

    /// Display name of the traced handler
    pub name: String,

    /// When the invocation started
    pub started_at: DateTime<Utc>,

    /// When the invocation was finalized
    pub completed_at: DateTime<Utc>,

    /// `completed_at - started_at` in milliseconds
    pub total_duration_ms: f64,

    /// Overall status
    pub status: TraceStatus,

    /// Number of recorded steps
    pub total_steps: usize,

    /// Recorded steps in completion order
    pub steps: Vec<Step>,

    /// Summary of the failure that made the invocation fail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_summary: Option<String>,
}

impl TraceReport {
    /// Whether the invocation completed without any failure
    pub fn is_completed(&self) -> bool {
        self.status == TraceStatus::Completed
    }

    /// Steps whose call failed
    pub fn failed_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|step| step.is_failed())
    }

    /// Look up a step by method name (first match in order)
    pub fn step(&self, method: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.method == method)
    }

    /// Report as a JSON value
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Report as pretty-printed JSON
    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report and check its step numbering
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let report: TraceReport = serde_json::from_str(json)?;
        report.check_orders()?;
        Ok(report)
    }

    fn check_orders(&self) -> Result<(), TraceError> {
        if self.total_steps != self.steps.len() {
            return Err(TraceError::InvalidReport {
                message: format!(
                    "total_steps is {} but {} steps are present",
                    self.total_steps,
                    self.steps.len()
                ),
            });
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.order != index + 1 {
                return Err(TraceError::InvalidReport {
                    message: format!("step {} has order {}", index + 1, step.order),
                });
            }
        }

        Ok(())
    }
}

/// Embed a report into response data under [`EXECUTION_TRACE_KEY`]
///
/// Returns `Ok(true)` when the report was inserted and `Ok(false)` when
/// `data` is not a JSON object, in which case it is left untouched. Data
/// that already uses the reserved key is rejected.
pub fn inject_trace(
    data: &mut serde_json::Value,
    report: &TraceReport,
) -> Result<bool, TraceError> {
    let Some(object) = data.as_object_mut() else {
        return Ok(false);
    };

    if object.contains_key(EXECUTION_TRACE_KEY) {
        return Err(TraceError::ReservedKey {
            key: EXECUTION_TRACE_KEY.to_string(),
        });
    }

    object.insert(EXECUTION_TRACE_KEY.to_string(), report.to_value());
    Ok(true)
}

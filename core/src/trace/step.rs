//! Recorded step structures

use serde::{Deserialize, Serialize};

/// Outcome of a single traced call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Failed,
}

impl StepStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Ok => "ok",
            StepStatus::Failed => "failed",
        }
    }
}

/// One recorded call of a traced method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in completion order, assigned by the recorder
    pub order: usize,

    /// Type that defines the traced method
    pub owner: String,

    /// Name of the traced method
    pub method: String,

    /// Whether the call returned or failed
    pub status: StepStatus,

    /// Captured arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,

    /// Captured return value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,

    /// Time between entry and exit in milliseconds
    pub duration_ms: f64,

    /// `"<Kind>: <message>"` summary of the failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Step {
    /// Create a step for a call that returned normally
    pub fn ok<O: Into<String>, M: Into<String>>(
        owner: O,
        method: M,
        input: Option<serde_json::Value>,
        output: Option<serde_json::Value>,
        duration_ms: f64,
    ) -> Self {
        Self {
            order: 0,
            owner: owner.into(),
            method: method.into(),
            status: StepStatus::Ok,
            input,
            output,
            duration_ms,
            error: None,
        }
    }

    /// Create a step for a call that failed
    pub fn failed<O: Into<String>, M: Into<String>>(
        owner: O,
        method: M,
        input: Option<serde_json::Value>,
        error: String,
        duration_ms: f64,
    ) -> Self {
        Self {
            order: 0,
            owner: owner.into(),
            method: method.into(),
            status: StepStatus::Failed,
            input,
            output: None,
            duration_ms,
            error: Some(error),
        }
    }

    /// Whether this step failed
    pub fn is_failed(&self) -> bool {
        self.status == StepStatus::Failed
    }

    /// `Owner::method` label
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.owner, self.method)
    }
}

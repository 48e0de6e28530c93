//! Handler roles and their result types

use crate::error::TraceError;
use crate::handler::{Context, PreProcessorContext};
use crate::trace::{inject_trace, TraceReport};
use serde::{Deserialize, Serialize};

/// Active handler: executes against a context and returns a response
pub trait Tool {
    /// Business error returned by `execute`
    type Error: std::fmt::Display;

    /// Execute the tool
    fn execute(&mut self, context: &Context) -> Result<ToolResponse, Self::Error>;
}

/// Passive handler: processes an incoming payload and returns processed data
pub trait PreProcessor {
    /// Business error returned by `process`
    type Error: std::fmt::Display;

    /// Process the payload
    fn process(&mut self, context: &PreProcessorContext) -> Result<ProcessedData, Self::Error>;
}

/// Response produced by a tool: business data plus its display format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Business data
    pub data: serde_json::Value,

    /// Display format for the data
    pub format: serde_json::Value,
}

impl ToolResponse {
    /// Create a response with an explicit format
    pub fn new(data: serde_json::Value, format: serde_json::Value) -> Self {
        Self { data, format }
    }

    /// Create a plain text response
    pub fn text(data: serde_json::Value) -> Self {
        Self {
            data,
            format: serde_json::json!({"msg": {"text": "Hello, how can I help you today?"}}),
        }
    }

    /// Embed the trace into `data` for consumers that only read response data
    pub fn with_injected_trace(mut self, report: &TraceReport) -> Result<Self, TraceError> {
        inject_trace(&mut self.data, report)?;
        Ok(self)
    }
}

/// Data produced by a preprocessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedData {
    /// Contact URN the data belongs to
    pub urn: String,

    /// Processed payload
    pub data: serde_json::Value,
}

impl ProcessedData {
    /// Create processed data
    pub fn new<S: Into<String>>(urn: S, data: serde_json::Value) -> Self {
        Self {
            urn: urn.into(),
            data,
        }
    }

    /// Embed the trace into `data` for consumers that only read processed data
    pub fn with_injected_trace(mut self, report: &TraceReport) -> Result<Self, TraceError> {
        inject_trace(&mut self.data, report)?;
        Ok(self)
    }
}

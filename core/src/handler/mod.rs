//! Handler roles, contexts and traced runners

pub mod base;
pub mod context;
pub mod runner;

pub use base::{PreProcessor, ProcessedData, Tool, ToolResponse};
pub use context::{Context, PreProcessorContext};
pub use runner::{run_traced, run_traced_preprocessor, run_traced_tool, TracedRun};

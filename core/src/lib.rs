//! # tooltrace Core
//!
//! Core library for tooltrace - execution tracing for short-lived,
//! synchronous agent tool handlers.
//!
//! A handler holds a [`Tracer`] and implements [`Traced`]; methods run
//! through a [`Trace`] decoration are recorded as ordered, timed steps, and
//! each invocation ends with a [`TraceReport`] returned next to the
//! handler's own result.

// Core modules
pub mod config;
pub mod error;
pub mod handler;
pub mod trace;

// Re-export commonly used types
pub use config::{CaptureLimits, ReuseGuard, TraceConfig};
pub use handler::{
    run_traced_preprocessor, run_traced_tool, Context, PreProcessor, PreProcessorContext,
    ProcessedData, Tool, ToolResponse, TracedRun,
};
pub use trace::{
    Outcome, Step, StepStatus, Trace, TraceReport, TraceStatus, Traced, Tracer,
    EXECUTION_TRACE_KEY,
};

/// Current version of the tooltrace-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing with a specific debug mode
///
/// Logs are written to stderr; `RUST_LOG` takes precedence over the mode
/// when set.
pub fn init_tracing_with_debug(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_filter(debug))
        .with_writer(std::io::stderr)
        .init();
}

fn tracing_filter(debug: bool) -> tracing_subscriber::EnvFilter {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
}

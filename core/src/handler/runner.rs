//! Running traced handlers for one invocation

use crate::handler::{
    Context, PreProcessor, PreProcessorContext, ProcessedData, Tool, ToolResponse,
};
use crate::trace::{Outcome, TraceReport, Traced};
use tracing::{debug, info};

/// Result of a traced invocation with its trace alongside
#[derive(Debug)]
pub struct TracedRun<T, E> {
    /// What the handler returned, untouched
    pub result: Result<T, E>,

    /// Trace of the invocation
    pub trace: TraceReport,
}

impl<T, E> TracedRun<T, E> {
    /// Whether the handler returned normally
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Split into result and trace
    pub fn into_parts(self) -> (Result<T, E>, TraceReport) {
        (self.result, self.trace)
    }
}

/// Execute a traced tool once
///
/// The tool's tracer is reset first, so pooled instances can be reused
/// across requests.
pub fn run_traced_tool<T>(tool: &mut T, context: &Context) -> TracedRun<ToolResponse, T::Error>
where
    T: Tool + Traced,
{
    run_traced(tool, |tool| tool.execute(context))
}

/// Process a payload with a traced preprocessor once
pub fn run_traced_preprocessor<P>(
    preprocessor: &mut P,
    context: &PreProcessorContext,
) -> TracedRun<ProcessedData, P::Error>
where
    P: PreProcessor + Traced,
{
    run_traced(preprocessor, |preprocessor| preprocessor.process(context))
}

/// Reset, begin, invoke and finalize around an arbitrary entry point
pub fn run_traced<H, T, E, F>(handler: &mut H, entry: F) -> TracedRun<T, E>
where
    H: Traced,
    E: std::fmt::Display,
    F: FnOnce(&mut H) -> Result<T, E>,
{
    let name = handler.trace_name();
    debug!("Starting traced invocation of {}", name);

    handler.reset_trace();
    handler.begin_trace();
    let result = entry(handler);
    let trace = handler.finalize_trace(Outcome::of(&result));

    info!(
        "{} finished: {} ({} steps, {:.2}ms)",
        trace.name,
        trace.status.as_str(),
        trace.total_steps,
        trace.total_duration_ms
    );

    TracedRun { result, trace }
}

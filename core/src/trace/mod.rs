//! Execution tracing for handler methods

pub mod capture;
pub mod clock;
pub mod decorator;
pub mod formatter;
pub mod recorder;
pub mod report;
pub mod step;
pub mod tracer;

pub use capture::{capture_args, capture_value, short_type_name, summarize_error, CapturePolicy};
pub use clock::Stopwatch;
pub use decorator::Trace;
pub use formatter::ReportFormatter;
pub use recorder::StepRecorder;
pub use report::{inject_trace, Outcome, TraceReport, TraceStatus, EXECUTION_TRACE_KEY};
pub use step::{Step, StepStatus};
pub use tracer::{TraceTarget, Traced, Tracer};

// Names kept for handlers written against the earlier API.
pub use tracer::Traced as TracedAgent;
pub use tracer::Traced as TracedProcessor;
pub use tracer::Traced as ExecutionTracerMixin;

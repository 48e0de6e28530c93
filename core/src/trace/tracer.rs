//! The traced capability: per-instance tracer state and the `Traced` trait

use crate::config::{CaptureLimits, ReuseGuard, TraceConfig};
use crate::trace::capture::short_type_name;
use crate::trace::clock::{duration_ms, Stopwatch};
use crate::trace::report::{Outcome, TraceReport, TraceStatus};
use crate::trace::{Step, StepRecorder};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

/// Start of the current invocation on both clocks
#[derive(Debug, Clone, Copy)]
struct Started {
    at: DateTime<Utc>,
    watch: Stopwatch,
}

/// Tracing state owned by one handler instance
///
/// One `Tracer` serves one invocation at a time. Call [`Tracer::reset`]
/// before reusing the owning instance, otherwise the next report also
/// contains the previous invocation's steps.
#[derive(Debug, Clone, Default)]
pub struct Tracer {
    name: Option<String>,
    config: TraceConfig,
    recorder: StepRecorder,
    started: Option<Started>,
    finalized: bool,
}

impl Tracer {
    /// Create a tracer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracer with the given configuration
    pub fn with_config(config: TraceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Override the display name used in reports
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set or clear the display name override
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Display name override, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Active configuration
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Capture bounds for recorded values
    pub fn limits(&self) -> &CaptureLimits {
        &self.config.capture
    }

    /// Recorded steps
    pub fn recorder(&self) -> &StepRecorder {
        &self.recorder
    }

    /// When the current invocation started, if it has
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started.map(|s| s.at)
    }

    /// Whether the current invocation has started
    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    /// Whether a report was produced and the tracer has not been reset since
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Mark the start of an invocation; no-op if already started
    pub fn begin(&mut self) {
        if self.finalized {
            self.report_reuse("begin");
        }

        if self.started.is_none() {
            self.started = Some(Started {
                at: Utc::now(),
                watch: Stopwatch::start(),
            });
        }
    }

    /// Append a step, starting the invocation first if needed
    pub fn record(&mut self, step: Step) -> usize {
        if self.finalized {
            self.report_reuse("record");
        }
        if self.started.is_none() {
            self.begin();
        }

        let status = step.status;
        let label = step.qualified_name();
        let duration = step.duration_ms;
        let order = self.recorder.append(step);

        debug!(
            order,
            step = %label,
            status = status.as_str(),
            duration_ms = duration,
            "Recorded traced step"
        );

        order
    }

    /// Clear recorded steps and the start time
    pub fn reset(&mut self) {
        self.recorder.clear();
        self.started = None;
        self.finalized = false;
    }

    /// Build the report for the current invocation
    ///
    /// Never fails: an empty recorder yields a completed report with no
    /// steps, and a tracer that never started yields a zero duration.
    pub fn finalize(&mut self, name: &str, outcome: Outcome) -> TraceReport {
        let (started_at, elapsed) = match self.started {
            Some(started) => (started.at, started.watch.elapsed()),
            None => (Utc::now(), std::time::Duration::ZERO),
        };
        let completed_at = started_at
            + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero());

        let steps = self.recorder.steps().to_vec();
        let failed = outcome.error().is_some() || self.recorder.has_failures();
        let (status, error_summary) = if failed {
            let summary = outcome
                .error()
                .or_else(|| self.recorder.first_error())
                .map(str::to_string);
            (TraceStatus::Failed, summary)
        } else {
            (TraceStatus::Completed, None)
        };

        let name = self.name.clone().unwrap_or_else(|| name.to_string());
        self.finalized = true;

        debug!(
            name = %name,
            steps = steps.len(),
            status = status.as_str(),
            "Finalized trace"
        );

        TraceReport {
            trace_id: Uuid::new_v4(),
            name,
            started_at,
            completed_at,
            total_duration_ms: duration_ms(elapsed),
            status,
            total_steps: steps.len(),
            steps,
            error_summary,
        }
    }

    fn report_reuse(&mut self, during: &str) {
        if self.config.reuse_guard == ReuseGuard::Warn {
            warn!(
                during,
                recorded = self.recorder.len(),
                "Tracer reused without reset; the next report will span several invocations"
            );
        }
        // Warn once per reuse
        self.finalized = false;
    }
}

/// Capability of a handler type whose calls can be traced
///
/// Implementors hold a [`Tracer`] and expose it; everything else is
/// provided. Set `TRACE_NAME` to replace the type name in reports.
pub trait Traced {
    /// Display name for reports; the concrete type name is used when `None`
    const TRACE_NAME: Option<&'static str> = None;

    /// The tracer owned by this instance
    fn tracer(&self) -> &Tracer;

    /// Mutable access to the tracer owned by this instance
    fn tracer_mut(&mut self) -> &mut Tracer;

    /// Name used in reports
    fn trace_name(&self) -> String {
        if let Some(name) = self.tracer().name() {
            return name.to_string();
        }
        match Self::TRACE_NAME {
            Some(name) => name.to_string(),
            None => short_type_name::<Self>().into_owned(),
        }
    }

    /// Mark the start of an invocation
    fn begin_trace(&mut self) {
        self.tracer_mut().begin();
    }

    /// Forget everything recorded so the instance can be reused
    fn reset_trace(&mut self) {
        self.tracer_mut().reset();
    }

    /// Produce the report for the current invocation
    fn finalize_trace(&mut self, outcome: Outcome) -> TraceReport {
        let name = self.trace_name();
        self.tracer_mut().finalize(&name, outcome)
    }
}

/// Receiver seen by the trace decorator
///
/// Every [`Traced`] type is a target with a tracer. Types that do not trace
/// implement this with the default method and run decorated calls
/// untouched.
pub trait TraceTarget {
    /// Tracer to record into, if this receiver traces at all
    fn trace_sink(&mut self) -> Option<&mut Tracer> {
        None
    }
}

impl<T: Traced> TraceTarget for T {
    fn trace_sink(&mut self) -> Option<&mut Tracer> {
        Some(self.tracer_mut())
    }
}

/// Implement [`Traced`] for a type that stores its tracer in a field
///
/// ```ignore
/// impl_traced!(WeatherTool, tracer);
/// impl_traced!(WeatherTool, tracer, "weather");
/// ```
#[macro_export]
macro_rules! impl_traced {
    ($handler:ty, $field:ident) => {
        impl $crate::trace::Traced for $handler {
            fn tracer(&self) -> &$crate::trace::Tracer {
                &self.$field
            }

            fn tracer_mut(&mut self) -> &mut $crate::trace::Tracer {
                &mut self.$field
            }
        }
    };
    ($handler:ty, $field:ident, $name:expr) => {
        impl $crate::trace::Traced for $handler {
            const TRACE_NAME: Option<&'static str> = Some($name);

            fn tracer(&self) -> &$crate::trace::Tracer {
                &self.$field
            }

            fn tracer_mut(&mut self) -> &mut $crate::trace::Tracer {
                &mut self.$field
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Plain {
        tracer: Tracer,
    }

    crate::impl_traced!(Plain, tracer);

    #[derive(Default)]
    struct Named {
        tracer: Tracer,
    }

    crate::impl_traced!(Named, tracer, "CustomName");

    fn ok_step(method: &str) -> Step {
        Step::ok("Plain", method, None, None, 0.0)
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert_eq!(Plain::default().trace_name(), "Plain");
    }

    #[test]
    fn test_declared_name_wins_over_type_name() {
        assert_eq!(Named::default().trace_name(), "CustomName");
    }

    #[test]
    fn test_instance_override_wins_over_declared_name() {
        let named = Named {
            tracer: Tracer::new().with_name("per-request"),
        };
        assert_eq!(named.trace_name(), "per-request");
    }

    #[test]
    fn test_finalize_empty_recorder() {
        let mut plain = Plain::default();
        plain.begin_trace();
        let report = plain.finalize_trace(Outcome::Completed);

        assert_eq!(report.total_steps, 0);
        assert!(report.steps.is_empty());
        assert_eq!(report.status, TraceStatus::Completed);
        assert!(report.error_summary.is_none());
        assert!(report.completed_at >= report.started_at);
    }

    #[test]
    fn test_finalize_without_begin_has_zero_duration() {
        let mut plain = Plain::default();
        let report = plain.finalize_trace(Outcome::Completed);

        assert_eq!(report.total_duration_ms, 0.0);
        assert_eq!(report.started_at, report.completed_at);
    }

    #[test]
    fn test_finalize_does_not_mutate_recorder() {
        let mut plain = Plain::default();
        plain.tracer_mut().record(ok_step("a"));

        let first = plain.finalize_trace(Outcome::Completed);
        let second = plain.finalize_trace(Outcome::Completed);

        assert_eq!(first.steps, second.steps);
        assert_eq!(plain.tracer().recorder().len(), 1);
        assert_ne!(first.trace_id, second.trace_id);
    }

    #[test]
    fn test_outer_failure_marks_report_failed() {
        let mut plain = Plain::default();
        plain.tracer_mut().record(ok_step("a"));
        let report = plain.finalize_trace(Outcome::Failed("IoError: boom".to_string()));

        assert_eq!(report.status, TraceStatus::Failed);
        assert_eq!(report.error_summary.as_deref(), Some("IoError: boom"));
    }

    #[test]
    fn test_failed_step_marks_report_failed_even_if_caught() {
        let mut plain = Plain::default();
        plain.tracer_mut().record(Step::failed(
            "Plain",
            "lookup",
            None,
            "NotFound: key".to_string(),
            0.0,
        ));
        plain.tracer_mut().record(ok_step("fallback"));
        let report = plain.finalize_trace(Outcome::Completed);

        assert_eq!(report.status, TraceStatus::Failed);
        assert_eq!(report.error_summary.as_deref(), Some("NotFound: key"));
    }

    #[test]
    fn test_record_auto_begins() {
        let mut tracer = Tracer::new();
        assert!(!tracer.is_started());

        tracer.record(ok_step("a"));
        assert!(tracer.is_started());
    }

    #[test]
    fn test_reset_clears_steps_and_start() {
        let mut plain = Plain::default();
        plain.begin_trace();
        plain.tracer_mut().record(ok_step("a"));
        plain.finalize_trace(Outcome::Completed);
        plain.reset_trace();

        assert!(plain.tracer().recorder().is_empty());
        assert!(plain.tracer().started_at().is_none());
        assert!(!plain.tracer().is_finalized());
    }

    #[test]
    fn test_reuse_without_reset_spans_invocations() {
        let mut plain = Plain::default();
        plain.tracer_mut().record(ok_step("first"));
        plain.finalize_trace(Outcome::Completed);
        assert!(plain.tracer().is_finalized());

        plain.tracer_mut().record(ok_step("second"));
        assert!(!plain.tracer().is_finalized());

        let report = plain.finalize_trace(Outcome::Completed);
        let methods: Vec<&str> = report.steps.iter().map(|s| s.method.as_str()).collect();
        assert_eq!(methods, vec!["first", "second"]);
        assert_eq!(report.steps[1].order, 2);
    }

    #[test]
    fn test_tracer_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Tracer>();
    }
}

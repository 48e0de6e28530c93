//! Trace decorator for individual handler methods
//!
//! A [`Trace`] value describes one decorated method: its name and what may be
//! captured from it. Running a call through it times the call, records a
//! [`Step`] into the receiver's tracer once the call has returned or failed,
//! and hands the original result back untouched.
//!
//! ```ignore
//! const FETCH: Trace = Trace::method("fetch");
//! const LOGIN: Trace = Trace::method("login").capture_output(false);
//!
//! impl WeatherTool {
//!     fn fetch(&mut self, city: &str) -> Result<Forecast, FetchError> {
//!         FETCH.call(self, city, |this, city| this.client.forecast(city))
//!     }
//! }
//! ```

use crate::trace::capture::{
    capture_args, capture_value, short_type_name, summarize_error, CapturePolicy,
};
use crate::trace::clock::Stopwatch;
use crate::trace::{Step, TraceTarget};
use serde::Serialize;
use std::convert::Infallible;
use std::fmt::Display;

/// A decorated method: its name plus the capture policy for its steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    method: &'static str,
    policy: CapturePolicy,
}

impl Trace {
    /// Decorate a method, capturing both input and output
    pub const fn method(method: &'static str) -> Self {
        Self {
            method,
            policy: CapturePolicy::new(),
        }
    }

    /// Set whether arguments are captured
    pub const fn capture_input(mut self, capture: bool) -> Self {
        self.policy.capture_input = capture;
        self
    }

    /// Set whether the return value is captured
    pub const fn capture_output(mut self, capture: bool) -> Self {
        self.policy.capture_output = capture;
        self
    }

    /// Capture neither input nor output
    pub const fn redacted(mut self) -> Self {
        self.policy = CapturePolicy::redacted();
        self
    }

    /// Name of the decorated method
    pub fn name(&self) -> &'static str {
        self.method
    }

    /// Capture policy of this decoration
    pub fn policy(&self) -> CapturePolicy {
        self.policy
    }

    /// Run one call of the decorated method
    ///
    /// `args` are captured (per policy) before being moved into `body`; a
    /// tuple of arguments is captured element by element.
    /// The step is appended after `body` finishes, so decorated calls made
    /// inside `body` are recorded first. A receiver without a tracer runs
    /// `body` directly.
    pub fn call<H, A, R, E, F>(&self, receiver: &mut H, args: A, body: F) -> Result<R, E>
    where
        H: TraceTarget,
        A: Serialize,
        R: Serialize,
        E: Display,
        F: FnOnce(&mut H, A) -> Result<R, E>,
    {
        let limits = match receiver.trace_sink() {
            Some(tracer) => {
                tracer.begin();
                *tracer.limits()
            }
            None => return body(receiver, args),
        };

        let input = self
            .policy
            .capture_input
            .then(|| capture_args(&args, &limits));

        let watch = Stopwatch::start();
        let result = body(receiver, args);
        let duration_ms = watch.elapsed_ms();

        let owner = short_type_name::<H>();
        let step = match &result {
            Ok(value) => {
                let output = self
                    .policy
                    .capture_output
                    .then(|| capture_value(value, &limits));
                Step::ok(owner, self.method, input, output, duration_ms)
            }
            Err(error) => Step::failed(
                owner,
                self.method,
                input,
                summarize_error(error),
                duration_ms,
            ),
        };

        if let Some(tracer) = receiver.trace_sink() {
            tracer.record(step);
        }

        result
    }

    /// Run one call of a decorated method that cannot fail
    pub fn call_ok<H, A, R, F>(&self, receiver: &mut H, args: A, body: F) -> R
    where
        H: TraceTarget,
        A: Serialize,
        R: Serialize,
        F: FnOnce(&mut H, A) -> R,
    {
        let result: Result<R, Infallible> =
            self.call(receiver, args, |receiver, args| Ok(body(receiver, args)));
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Wrap `body` into a callable with the same signature that traces
    /// every call
    pub fn wrap<H, A, R, E, F>(self, body: F) -> impl Fn(&mut H, A) -> Result<R, E>
    where
        H: TraceTarget,
        A: Serialize,
        R: Serialize,
        E: Display,
        F: Fn(&mut H, A) -> Result<R, E>,
    {
        move |receiver: &mut H, args: A| self.call(receiver, args, &body)
    }
}

//! Minimal configuration module for tooltrace core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{CaptureLimits, ReuseGuard, TraceConfig};

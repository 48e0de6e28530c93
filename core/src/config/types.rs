//! Configuration types for tooltrace core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Bounds applied to captured step inputs and outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureLimits {
    /// Nesting depth kept before a value is replaced by a marker
    pub max_depth: usize,
    /// Maximum characters kept from a string
    pub max_string_len: usize,
    /// Maximum elements kept from an array or keys kept from an object
    pub max_items: usize,
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_string_len: 1000,
            max_items: 50,
        }
    }
}

/// What a tracer does when it records again after being finalized
/// without a reset in between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReuseGuard {
    /// Log a warning once per reuse
    #[default]
    Warn,
    /// Say nothing
    Off,
}

impl ReuseGuard {
    /// Get the guard name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReuseGuard::Warn => "warn",
            ReuseGuard::Off => "off",
        }
    }
}

impl std::str::FromStr for ReuseGuard {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(ReuseGuard::Warn),
            "off" => Ok(ReuseGuard::Off),
            other => Err(ConfigError::InvalidValue {
                field: "reuse_guard".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Resolved tracing configuration handed to every `Tracer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Bounds for captured values
    pub capture: CaptureLimits,
    /// Behavior on reuse without reset
    pub reuse_guard: ReuseGuard,
}

impl TraceConfig {
    /// Set capture limits
    pub fn with_capture(mut self, capture: CaptureLimits) -> Self {
        self.capture = capture;
        self
    }

    /// Set the reuse guard
    pub fn with_reuse_guard(mut self, reuse_guard: ReuseGuard) -> Self {
        self.reuse_guard = reuse_guard;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("capture.max_depth", self.capture.max_depth),
            ("capture.max_string_len", self.capture.max_string_len),
            ("capture.max_items", self.capture.max_items),
        ];

        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }
}

//! Immutable invocation contexts handed to handlers
//!
//! Contexts can be captured as traced-call input; credentials are never
//! serialized.

use serde::Serialize;
use serde_json::{Map, Value};

/// Context for an active handler (tool) invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct Context {
    #[serde(skip_serializing)]
    credentials: Map<String, Value>,
    parameters: Map<String, Value>,
    globals: Map<String, Value>,
    contact: Map<String, Value>,
    project: Map<String, Value>,
    constants: Map<String, Value>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Map<String, Value>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set parameters
    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set globals
    pub fn with_globals(mut self, globals: Map<String, Value>) -> Self {
        self.globals = globals;
        self
    }

    /// Set contact data
    pub fn with_contact(mut self, contact: Map<String, Value>) -> Self {
        self.contact = contact;
        self
    }

    /// Set project data
    pub fn with_project(mut self, project: Map<String, Value>) -> Self {
        self.project = project;
        self
    }

    /// Set constants
    pub fn with_constants(mut self, constants: Map<String, Value>) -> Self {
        self.constants = constants;
        self
    }

    pub fn credentials(&self) -> &Map<String, Value> {
        &self.credentials
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    pub fn globals(&self) -> &Map<String, Value> {
        &self.globals
    }

    pub fn contact(&self) -> &Map<String, Value> {
        &self.contact
    }

    pub fn project(&self) -> &Map<String, Value> {
        &self.project
    }

    pub fn constants(&self) -> &Map<String, Value> {
        &self.constants
    }

    /// Get a string parameter by key
    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }

    /// Get a string credential by key
    pub fn credential_str(&self, key: &str) -> Option<&str> {
        self.credentials.get(key).and_then(Value::as_str)
    }
}

/// Context for a passive handler (preprocessor) invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreProcessorContext {
    params: Map<String, Value>,
    payload: Map<String, Value>,
    #[serde(skip_serializing)]
    credentials: Map<String, Value>,
    project: Map<String, Value>,
}

impl PreProcessorContext {
    /// Create a context around an incoming payload
    pub fn new(payload: Map<String, Value>) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Set params
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Map<String, Value>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set project data
    pub fn with_project(mut self, project: Map<String, Value>) -> Self {
        self.project = project;
        self
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn credentials(&self) -> &Map<String, Value> {
        &self.credentials
    }

    pub fn project(&self) -> &Map<String, Value> {
        &self.project
    }
}

//! Payload normalizer used by the demo command

use serde_json::{json, Value};
use thiserror::Error;
use tooltrace_core::trace::{Trace, Tracer};
use tooltrace_core::{impl_traced, PreProcessor, PreProcessorContext, ProcessedData, TraceConfig};

const EXTRACT: Trace = Trace::method("extract_text");
const NORMALIZE: Trace = Trace::method("normalize");
const RESOLVE_URN: Trace = Trace::method("resolve_urn");

#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
    #[error("payload field '{0}' is missing or not a string")]
    MissingField(&'static str),
}

/// Passive demo handler: turns a raw channel payload into contact data
#[derive(Debug, Default)]
pub struct PayloadNormalizer {
    tracer: Tracer,
}

impl_traced!(PayloadNormalizer, tracer);

impl PayloadNormalizer {
    pub fn new(config: TraceConfig) -> Self {
        Self {
            tracer: Tracer::with_config(config),
        }
    }

    fn extract_text(&mut self, payload: &Value) -> Result<String, NormalizeError> {
        EXTRACT.call(self, payload, |_, payload| {
            payload
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(NormalizeError::MissingField("text"))
        })
    }

    fn normalize(&mut self, text: String) -> String {
        NORMALIZE.call_ok(self, text, |_, text| {
            text.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
    }

    fn resolve_urn(&mut self, payload: &Value) -> Result<String, NormalizeError> {
        RESOLVE_URN.call(self, payload.get("from"), |_, from| {
            let from = from
                .and_then(Value::as_str)
                .ok_or(NormalizeError::MissingField("from"))?;
            let digits: String = from.chars().filter(char::is_ascii_digit).collect();
            Ok(format!("whatsapp:{}", digits))
        })
    }
}

impl PreProcessor for PayloadNormalizer {
    type Error = NormalizeError;

    fn process(
        &mut self,
        context: &PreProcessorContext,
    ) -> Result<ProcessedData, NormalizeError> {
        let payload = Value::Object(context.payload().clone());

        let text = self.extract_text(&payload)?;
        let text = self.normalize(text);
        let urn = self.resolve_urn(&payload)?;

        Ok(ProcessedData::new(urn, json!({ "text": text })))
    }
}

//! Demo command: run the built-in handlers and show their traces

use crate::config::CliConfigLoader;
use crate::output::{print_json, print_report};
use crate::tools::{PayloadNormalizer, WeatherTool};
use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tooltrace_core::{
    run_traced_preprocessor, run_traced_tool, Context, PreProcessorContext, TraceReport, TracedRun,
};
use tracing::info;

/// Options for the demo command
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Make the tool's validation step fail
    pub fail: bool,
    /// Embed the tool trace into its response data
    pub inject: bool,
    /// Print JSON instead of formatted reports
    pub json: bool,
    /// City passed to the weather tool
    pub city: String,
}

/// One handler run as printed by the demo
#[derive(Debug, Serialize)]
struct DemoEntry {
    result: Option<Value>,
    error: Option<String>,
    trace: TraceReport,
}

#[derive(Debug, Serialize)]
struct DemoOutput {
    tool: DemoEntry,
    preprocessor: DemoEntry,
}

/// Run the demo handlers
pub fn demo_command(loader: CliConfigLoader, options: DemoOptions) -> Result<()> {
    let config = loader.load()?;
    info!("Running demo handlers");

    let mut tool = WeatherTool::new(config).with_corrupt_readings(options.fail);
    let (result, trace) = run_traced_tool(&mut tool, &tool_context(&options.city)).into_parts();
    let tool_entry = match result {
        Ok(response) => {
            let response = if options.inject {
                response
                    .with_injected_trace(&trace)
                    .context("Failed to inject trace into tool response")?
            } else {
                response
            };
            DemoEntry {
                result: Some(response.data),
                error: None,
                trace,
            }
        }
        Err(e) => DemoEntry {
            result: None,
            error: Some(e.to_string()),
            trace,
        },
    };

    let mut normalizer = PayloadNormalizer::new(config);
    let run = run_traced_preprocessor(&mut normalizer, &preprocessor_context());
    let preprocessor_entry = entry(run, |data| json!({"urn": data.urn, "data": data.data}));

    let output = DemoOutput {
        tool: tool_entry,
        preprocessor: preprocessor_entry,
    };

    if options.json {
        return print_json(&output);
    }

    for (label, shown) in [("Tool", &output.tool), ("PreProcessor", &output.preprocessor)] {
        println!("── {} ──", label);
        print_report(&shown.trace);
        match (&shown.result, &shown.error) {
            (Some(data), _) => println!("Result: {}", serde_json::to_string_pretty(data)?),
            (None, Some(error)) => println!("Error: {}", error),
            (None, None) => {}
        }
        println!();
    }

    Ok(())
}

fn entry<T, E, F>(run: TracedRun<T, E>, data: F) -> DemoEntry
where
    E: std::fmt::Display,
    F: FnOnce(T) -> Value,
{
    let (result, trace) = run.into_parts();
    match result {
        Ok(value) => DemoEntry {
            result: Some(data(value)),
            error: None,
            trace,
        },
        Err(e) => DemoEntry {
            result: None,
            error: Some(e.to_string()),
            trace,
        },
    }
}

fn tool_context(city: &str) -> Context {
    let mut credentials = Map::new();
    credentials.insert("api_key".to_string(), json!("demo-key"));
    let mut parameters = Map::new();
    parameters.insert("city".to_string(), json!(city));

    Context::new()
        .with_credentials(credentials)
        .with_parameters(parameters)
}

fn preprocessor_context() -> PreProcessorContext {
    let mut payload = Map::new();
    payload.insert("text".to_string(), json!("  Will it RAIN   tomorrow? "));
    payload.insert("from".to_string(), json!("+55 81 98888-7777"));

    PreProcessorContext::new(payload)
}

//! Weather lookup tool used by the demo command
//!
//! Forecasts come from a fixed table so runs are reproducible.

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tooltrace_core::trace::{Trace, Tracer};
use tooltrace_core::{impl_traced, Context, Tool, ToolResponse, TraceConfig};

const AUTHENTICATE: Trace = Trace::method("authenticate").redacted();
const FETCH: Trace = Trace::method("fetch_forecast");
const VALIDATE: Trace = Trace::method("validate");

/// Errors raised by the weather tool
#[derive(Error, Debug, PartialEq)]
pub enum WeatherError {
    #[error("missing credential '{0}'")]
    MissingCredential(&'static str),

    #[error("no forecast for {0}")]
    UnknownCity(String),

    #[error("temperature {celsius}°C out of range for {city}")]
    OutOfRange { city: String, celsius: i32 },
}

/// Forecast returned by the fake provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub city: String,
    pub celsius: i32,
    pub conditions: String,
}

/// Active demo tool: authenticate, fetch a forecast, validate it
#[derive(Debug, Default)]
pub struct WeatherTool {
    tracer: Tracer,
    /// Report an impossible temperature so validation fails
    pub corrupt_readings: bool,
}

impl_traced!(WeatherTool, tracer);

impl WeatherTool {
    pub fn new(config: TraceConfig) -> Self {
        Self {
            tracer: Tracer::with_config(config),
            corrupt_readings: false,
        }
    }

    pub fn with_corrupt_readings(mut self, corrupt: bool) -> Self {
        self.corrupt_readings = corrupt;
        self
    }

    fn authenticate(&mut self, api_key: &str) -> Result<String, WeatherError> {
        AUTHENTICATE.call(self, api_key, |_, key| {
            Ok(format!("session-{}", key.len()))
        })
    }

    fn fetch_forecast(&mut self, city: &str) -> Result<Forecast, WeatherError> {
        FETCH.call(self, city, |this, city| {
            let (celsius, conditions) = match city.to_ascii_lowercase().as_str() {
                "recife" => (29, "sunny"),
                "lisbon" => (18, "cloudy"),
                "oslo" => (-3, "snow"),
                _ => return Err(WeatherError::UnknownCity(city.to_string())),
            };
            let celsius = if this.corrupt_readings {
                celsius + 100
            } else {
                celsius
            };

            Ok(Forecast {
                city: city.to_string(),
                celsius,
                conditions: conditions.to_string(),
            })
        })
    }

    fn validate(&mut self, forecast: Forecast) -> Result<Forecast, WeatherError> {
        VALIDATE.call(self, forecast, |_, forecast| {
            if !(-60..=60).contains(&forecast.celsius) {
                return Err(WeatherError::OutOfRange {
                    city: forecast.city,
                    celsius: forecast.celsius,
                });
            }
            Ok(forecast)
        })
    }
}

impl Tool for WeatherTool {
    type Error = WeatherError;

    fn execute(&mut self, context: &Context) -> Result<ToolResponse, WeatherError> {
        let api_key = context
            .credential_str("api_key")
            .ok_or(WeatherError::MissingCredential("api_key"))?
            .to_string();
        let city = context.parameter_str("city").unwrap_or("Recife").to_string();

        self.authenticate(&api_key)?;
        let forecast = self.fetch_forecast(&city)?;
        let forecast = self.validate(forecast)?;

        Ok(ToolResponse::text(json!({
            "city": forecast.city,
            "celsius": forecast.celsius,
            "conditions": forecast.conditions,
        })))
    }
}

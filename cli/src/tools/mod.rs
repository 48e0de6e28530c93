//! Built-in traced handlers for the demo command

pub mod normalizer;
pub mod weather;

pub use normalizer::PayloadNormalizer;
pub use weather::WeatherTool;

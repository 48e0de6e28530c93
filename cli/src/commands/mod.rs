//! CLI command implementations

pub mod config;
pub mod demo;
pub mod show;

pub use config::config_command;
pub use demo::{demo_command, DemoOptions};
pub use show::show_command;

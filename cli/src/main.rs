//! # tooltrace CLI
//!
//! Command-line interface for tooltrace - execution tracing for agent tool
//! handlers.
//!
//! ## Usage
//!
//! - `tooltrace demo` - Run the built-in traced handlers and print their traces
//! - `tooltrace demo --fail --json` - Same, with a failing validation step, as JSON
//! - `tooltrace show <file>` - Render a saved trace report
//! - `tooltrace config` - Print the resolved trace configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tooltrace_core::ReuseGuard;

mod commands;
mod config;
mod output;
mod tools;

use commands::{config_command, demo_command, show_command, DemoOptions};
use config::CliConfigLoader;

/// tooltrace - Execution traces for agent tool handlers
#[derive(Parser)]
#[command(name = "tooltrace")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Execution traces for agent tool handlers")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Maximum nesting depth of captured values
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Maximum characters kept from captured strings
    #[arg(long, global = true)]
    max_string_len: Option<usize>,

    /// Maximum items kept from captured arrays and objects
    #[arg(long, global = true)]
    max_items: Option<usize>,

    /// Behavior when a tracer is reused without reset (warn, off)
    #[arg(long, global = true)]
    reuse_guard: Option<ReuseGuard>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in traced handlers
    Demo {
        /// Make the tool's validation step fail
        #[arg(long)]
        fail: bool,

        /// Embed the tool trace into its response data
        #[arg(long)]
        inject: bool,

        /// Print JSON instead of formatted reports
        #[arg(long)]
        json: bool,

        /// City to look up
        #[arg(long, default_value = "Recife")]
        city: String,
    },

    /// Render a saved trace report
    Show {
        /// Report file (bare report or response data with an embedded trace)
        file: PathBuf,

        /// Print the parsed report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration
    Config,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(max_depth) = cli.max_depth {
        loader = loader.with_max_depth_override(max_depth);
    }

    if let Some(max_string_len) = cli.max_string_len {
        loader = loader.with_max_string_len_override(max_string_len);
    }

    if let Some(max_items) = cli.max_items {
        loader = loader.with_max_items_override(max_items);
    }

    if let Some(reuse_guard) = cli.reuse_guard {
        loader = loader.with_reuse_guard_override(reuse_guard);
    }

    loader
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so JSON output stays clean
    tooltrace_core::init_tracing_with_debug(cli.verbose);

    // Build configuration loader
    let config_loader = build_config_loader(&cli);

    match cli.command {
        Commands::Demo {
            fail,
            inject,
            json,
            city,
        } => demo_command(
            config_loader,
            DemoOptions {
                fail,
                inject,
                json,
                city,
            },
        ),
        Commands::Show { file, json } => show_command(&file, json),
        Commands::Config => config_command(config_loader),
    }
}

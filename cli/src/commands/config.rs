//! Config command: print the resolved trace configuration

use crate::config::CliConfigLoader;
use crate::output::print_json;
use anyhow::Result;
use serde_json::json;

/// Print the resolved configuration and where it came from
pub fn config_command(loader: CliConfigLoader) -> Result<()> {
    let (config, source) = loader.load_with_source()?;

    print_json(&json!({
        "source": source.to_string(),
        "config": config,
    }))
}

//! Configuration loading and the `config` command

use std::fs;
use std::path::Path;

use openracing_pedal_throttle::PedalConfig;
use tracing::debug;

use crate::error::CliError;
use crate::output;

/// Load a configuration file, or the defaults when no path is given.
///
/// Files ending in `.json` are parsed as JSON; anything else as YAML.
/// Missing keys take their default values.
pub fn load(path: Option<&Path>) -> Result<PedalConfig, CliError> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(PedalConfig::default());
    };

    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: PedalConfig = if is_json {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };

    config
        .validate()
        .map_err(|e| CliError::InvalidConfiguration(e.to_string()))?;

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Print the effective configuration.
pub fn execute(path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load(path)?;
    output::print_config(&config, json)?;
    Ok(())
}

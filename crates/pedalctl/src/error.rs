//! Error types for pedalctl

use openracing_pedal_throttle::ShellError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Replay line {line}: {message}")]
    ReplayParse { line: usize, message: String },

    #[error("Engine error: {0}")]
    Shell(#[from] ShellError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::IoError(_) => 2,
            CliError::InvalidConfiguration(_)
            | CliError::ReplayParse { .. }
            | CliError::JsonError(_)
            | CliError::YamlError(_) => 4,
            CliError::Shell(_) => 5,
        }
    }
}

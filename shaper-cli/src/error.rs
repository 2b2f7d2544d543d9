//! Error types for the CLI.

use crate::config::ConfigError;

/// Errors that end a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Settings file could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Settings file has error-level issues.
    #[error("Invalid configuration ({0} error(s)); run `shaper config validate`")]
    InvalidConfig(usize),

    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Input {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),

    /// Library error (configuration, input, template).
    #[error(transparent)]
    Shaper(#[from] shaper::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

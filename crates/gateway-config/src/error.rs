//! Configuration errors.

use std::path::PathBuf;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file content could not be parsed
    #[error("failed to parse config file {path}: {message}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The file extension is not a known format
    #[error("unsupported config format for {path}: expected .yaml, .yml, .toml or .json")]
    UnsupportedFormat {
        /// File path
        path: PathBuf,
    },

    /// An environment override could not be applied
    #[error("invalid value for {var}: {message}")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// What was wrong
        message: String,
    },

    /// The loaded configuration failed validation
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

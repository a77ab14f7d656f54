//! Error handling for the sheaf CLI.
//!
//! - `CliError` is the top-level error every command returns.
//! - `ConfigError` and `BuildError` carry the detail for their domain and
//!   convert into `CliError` via `#[from]`.
//! - Bundler failures are kept as [`sheaf_bundler::Error`] so their
//!   diagnostic codes survive to the final report.

mod report;

pub use report::{build_error_to_miette, bundler_error_to_miette, cli_error_to_miette};

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (file not found, invalid values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised by the CLI around a build
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// A build trigger failed inside the pipeline
    #[error("{0}")]
    Bundler(#[from] sheaf_bundler::Error),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The run was stopped with Ctrl-C
    #[error("Interrupted")]
    Interrupted,
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a sheaf.config.json file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    /// Mutually exclusive options were specified
    #[error("Conflicting options: {0}\n\nHint: These options cannot be used together")]
    ConflictingOptions(String),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Errors the CLI raises around a build, before or after the pipeline runs.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The project root doesn't exist or isn't a directory
    #[error("Project root not found: {}\n\nHint: Pass --root or set 'root' in sheaf.config.json", .0.display())]
    RootNotFound(PathBuf),

    /// The minify worker command could not be determined
    #[error("Cannot locate the minify worker: {0}\n\nHint: Set 'workerCommand' in sheaf.config.json or pass --no-fork")]
    WorkerUnavailable(String),

    /// A bundle was reported but its file is missing
    #[error("Bundle was not written: {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("sheaf.config.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("sheaf.config.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_build_error_root_not_found() {
        let err = BuildError::RootNotFound(PathBuf::from("/srv/forum"));
        let msg = err.to_string();
        assert!(msg.contains("/srv/forum"));
        assert!(msg.contains("--root"));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let cli_err: CliError = ConfigError::NotFound(PathBuf::from("test.json")).into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_cli_error_from_bundler_error() {
        let cli_err: CliError = sheaf_bundler::Error::Worker("gone".to_string()).into();
        assert!(matches!(cli_err, CliError::Bundler(_)));
        assert_eq!(cli_err.to_string(), "Minify worker error: gone");
    }

    #[test]
    fn test_cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io(_)));
        assert_eq!(cli_err.to_string(), "I/O error: denied");
    }

    #[test]
    fn test_build_error_converts_with_prefix() {
        let cli_err: CliError = BuildError::MissingOutput(PathBuf::from("nodebb.min.js")).into();
        assert_eq!(cli_err.to_string(), "Build error: Bundle was not written: nodebb.min.js");
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "maxWorkers".to_string(),
            value: "0".to_string(),
            hint: "Use at least one worker".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'maxWorkers': 0"));
        assert!(msg.contains("Hint: Use at least one worker"));
    }
}

//! Conversion of CLI errors into `miette` reports.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert a [`CliError`] into a [`Report`] for the top of `main`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bundler(e) => bundler_error_to_miette(e),
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}

/// Convert a [`BuildError`] into a [`Report`].
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::WorkerUnavailable(reason) => miette::miette!(
            code = "sheaf::worker",
            help = "Set 'workerCommand' in sheaf.config.json or pass --no-fork",
            "Cannot locate the minify worker: {}",
            reason
        ),
        other => miette::miette!("{}", other),
    }
}

/// Convert a bundler error, keeping its diagnostic code and help.
pub fn bundler_error_to_miette(err: sheaf_bundler::Error) -> Report {
    Report::new(err)
}

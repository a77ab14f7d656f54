//! Miette diagnostic metadata for bundler errors.
//!
//! Each error class gets a stable code and a short help line so the CLI can
//! render it with `miette` without knowing the variants.

use crate::Error;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Enumerate { .. } => "sheaf::enumerate",
            Error::PrepareDir { .. } => "sheaf::prepare_dir",
            Error::Link { .. } => "sheaf::link",
            Error::Minify { .. } => "sheaf::minify",
            Error::Worker(_) => "sheaf::worker",
            Error::Optimizer { .. } => "sheaf::optimizer",
            Error::Bundle { .. } => "sheaf::bundle",
            Error::StaticLink { .. } => "sheaf::static_link",
            Error::Registry(_) => "sheaf::registry",
            Error::Io(_) => "sheaf::io",
        }))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let help = match self {
            Error::Enumerate { .. } => {
                "Check that the module source exists; vendor modules usually need `npm install`"
            }
            Error::PrepareDir { .. } | Error::Bundle { .. } => {
                "Check permissions on the build directory"
            }
            Error::Link { .. } => "Remove the stale build directory and rebuild",
            Error::Minify { .. } => "The named source has a syntax error",
            Error::Worker(_) => "Retry with --no-fork to minify in-process",
            Error::Optimizer { .. } => {
                "Check that node and node_modules/requirejs are installed"
            }
            Error::StaticLink { .. } => {
                "Check the plugin's staticDirs entry; mounts must be relative paths"
            }
            Error::Registry(_) => "Check the plugin registry file is valid JSON",
            Error::Io(_) => return None,
        };
        Some(Box::new(help))
    }
}

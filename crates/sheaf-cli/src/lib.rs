//! Sheaf CLI - builds the forum's client and admin script bundles.
//!
//! This crate wraps [`sheaf_bundler::Pipeline`] in a command-line interface:
//! it loads configuration, sets up logging, runs the build triggers and
//! reports failures as `miette` diagnostics.
//!
//! # Architecture
//!
//! - [`cli`] - Argument definitions (clap derive)
//! - [`config`] - `sheaf.config.json` loading and validation
//! - [`commands`] - One module per subcommand
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - `tracing` subscriber setup
//! - [`ui`] - Status lines and build summaries on stderr
//!
//! The binary also hosts the minify worker: the pool re-runs the current
//! executable with the hidden `minify-worker` subcommand.
//!
//! # Example
//!
//! ```rust,no_run
//! use sheaf_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result};

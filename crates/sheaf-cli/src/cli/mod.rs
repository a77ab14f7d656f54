//! Command-line interface definition for sheaf.
//!
//! # Command Structure
//!
//! - `sheaf build` - Modules, both bundles, then plugin statics
//! - `sheaf modules` - Rebuild the per-module tree only
//! - `sheaf bundle` - Compose one or both target bundles
//! - `sheaf statics` - Relink plugin static directories
//! - `sheaf config` - Print the config schema or an example config

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, BundleArgs, Command, ConfigAction, ConfigArgs, ProjectArgs};
pub use enums::*;
pub use validation::parse_max_workers;

/// Sheaf - forum script bundler
#[derive(Parser, Debug)]
#[command(
    name = "sheaf",
    version,
    about = "Builds the forum's client and admin script bundles",
    long_about = "Sheaf assembles the forum's ordered script lists, vendor modules and plugin\n\
                  contributions into two bundles: the client application and the admin\n\
                  control panel. Development builds link sources; production builds minify."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

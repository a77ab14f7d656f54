use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;
use crate::cli::validation::parse_max_workers;

/// Available sheaf subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a full build
    ///
    /// Rebuilds the module tree, composes the client and admin bundles
    /// concurrently, then relinks plugin static directories.
    Build(BuildArgs),

    /// Rebuild the per-module tree under <buildDir>/src
    ///
    /// Production minifies every module; development links them.
    Modules(BuildArgs),

    /// Compose target bundles
    ///
    /// Runs the AMD optimizer, collects plugin scripts and writes the
    /// fixed-name bundle for each selected target.
    Bundle(BundleArgs),

    /// Relink plugin static directories under <buildDir>/plugins
    Statics(BuildArgs),

    /// Inspect the configuration format
    Config(ConfigArgs),

    /// Serve minify requests on stdin/stdout (spawned by the worker pool)
    #[command(hide = true)]
    MinifyWorker,
}

/// Options shared by every command that touches a project.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Path to a config file (default: <root>/sheaf.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root directory
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Build output directory, relative to the root
    #[arg(short = 'o', long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Build mode
    ///
    /// - development: link sources, never compress
    /// - production: minify modules and bundles
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Shorthand for --mode development
    #[arg(long, conflicts_with = "mode")]
    pub dev: bool,

    /// Minify in-process instead of in worker processes
    #[arg(long)]
    pub no_fork: bool,

    /// Maximum number of concurrently busy minify workers
    #[arg(long, value_name = "N", value_parser = parse_max_workers)]
    pub max_workers: Option<usize>,
}

/// Arguments for `build`, `modules` and `statics`
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Arguments for the bundle command
#[derive(Args, Debug, Clone)]
pub struct BundleArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Which bundle to compose
    #[arg(short, long, value_enum, default_value = "all")]
    pub target: TargetSelection,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the JSON schema of sheaf.config.json
    Schema,

    /// Print an example sheaf.config.json
    Example,
}

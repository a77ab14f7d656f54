//! Sheaf CLI - builds the forum's client and admin script bundles.
//!
//! This is the main entry point for the `sheaf` binary. It handles
//! command-line argument parsing, logging initialization, and command
//! dispatch.

use clap::Parser;
use miette::Result;
use sheaf_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Workers log plain stderr lines filtered by SHEAF_LOG; the parent owns the terminal
    if matches!(args.command, cli::Command::MinifyWorker) {
        sheaf_bundler::init_logging_from_env();
    } else {
        logger::init_logger(args.verbose, args.quiet, args.no_color);
        ui::init_colors();
    }

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Modules(modules_args) => commands::modules_execute(modules_args).await,
        cli::Command::Bundle(bundle_args) => commands::bundle_execute(bundle_args).await,
        cli::Command::Statics(statics_args) => commands::statics_execute(statics_args).await,
        cli::Command::Config(config_args) => commands::config_execute(config_args),
        cli::Command::MinifyWorker => commands::worker_execute().await,
    };

    // Convert CLI errors to miette diagnostics for error reporting
    result.map_err(error::cli_error_to_miette)
}

//! `sheaf build`: the full build.
//!
//! Modules first, then both bundles concurrently, then plugin statics. The
//! minify workers are killed before returning, whatever the outcome.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::SheafConfig;
use crate::error::Result;
use crate::ui;
use sheaf_bundler::{BuildTarget, BundleReport, ModulesReport, Pipeline, StaticsReport};
use std::time::Instant;

/// Everything a full build produced.
#[derive(Debug)]
pub struct BuildOutcome {
    pub modules: ModulesReport,
    pub bundles: Vec<BundleReport>,
    pub statics: StaticsReport,
}

/// Execute the build command.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let started = Instant::now();
    let config = SheafConfig::load(&args.project)?;
    let pipeline = utils::build_pipeline(&config)?;

    ui::info(&format!(
        "Building {} ({} mode)",
        pipeline.layout().root().display(),
        config.build_mode()
    ));

    let result = utils::interruptible(run(&pipeline, config.fork)).await;
    pipeline.kill_minifier();
    let outcome = result?;

    ui::print_modules_summary(&outcome.modules);
    ui::print_build_summary(&utils::bundle_rows(&outcome.bundles).await?);
    ui::info(&format!(
        "Linked {} plugin static director{} under {}",
        outcome.statics.mounts,
        if outcome.statics.mounts == 1 { "y" } else { "ies" },
        outcome.statics.root.display()
    ));
    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(started.elapsed())
    ));
    Ok(())
}

/// Run the three build stages in order.
pub async fn run(pipeline: &Pipeline, fork: bool) -> Result<BuildOutcome> {
    let modules = pipeline.build_modules(fork).await?;

    let (client, admin) = tokio::try_join!(
        pipeline.build_bundle(BuildTarget::Client, fork),
        pipeline.build_bundle(BuildTarget::Admin, fork),
    )?;

    let statics = pipeline.link_statics().await?;

    Ok(BuildOutcome {
        modules,
        bundles: vec![client, admin],
        statics,
    })
}

//! `sheaf bundle`: compose one or both target bundles.

use crate::cli::{BundleArgs, TargetSelection};
use crate::commands::utils;
use crate::config::SheafConfig;
use crate::error::Result;
use crate::ui;
use futures::future::try_join_all;
use sheaf_bundler::{BuildTarget, BundleReport, Pipeline};

pub async fn execute(args: BundleArgs) -> Result<()> {
    let config = SheafConfig::load(&args.project)?;
    let pipeline = utils::build_pipeline(&config)?;
    let targets = selected_targets(args.target);

    let result = utils::interruptible(run(&pipeline, targets, config.fork)).await;
    pipeline.kill_minifier();
    let reports = result?;

    ui::print_build_summary(&utils::bundle_rows(&reports).await?);
    ui::success(&format!(
        "Composed {} bundle{}",
        reports.len(),
        if reports.len() == 1 { "" } else { "s" }
    ));
    Ok(())
}

/// Compose every target concurrently. Reports come back in target order.
pub async fn run(
    pipeline: &Pipeline,
    targets: &[BuildTarget],
    fork: bool,
) -> Result<Vec<BundleReport>> {
    let reports = try_join_all(
        targets
            .iter()
            .map(|&target| pipeline.build_bundle(target, fork)),
    )
    .await?;
    Ok(reports)
}

/// Targets named by `--target`, client first.
pub fn selected_targets(selection: TargetSelection) -> &'static [BuildTarget] {
    match selection {
        TargetSelection::Client => &[BuildTarget::Client],
        TargetSelection::Admin => &[BuildTarget::Admin],
        TargetSelection::All => &BuildTarget::ALL,
    }
}

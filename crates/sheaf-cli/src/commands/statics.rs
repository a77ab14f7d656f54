//! `sheaf statics`: relink plugin static directories.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::SheafConfig;
use crate::error::{CliError, Result};
use crate::ui;

pub async fn execute(args: BuildArgs) -> Result<()> {
    let config = SheafConfig::load(&args.project)?;
    let pipeline = utils::build_pipeline(&config)?;

    let result =
        utils::interruptible(async { pipeline.link_statics().await.map_err(CliError::from) }).await;
    pipeline.kill_minifier();
    let report = result?;

    ui::success(&format!(
        "Linked {} static mount{} under {}",
        report.mounts,
        if report.mounts == 1 { "" } else { "s" },
        report.root.display()
    ));
    Ok(())
}

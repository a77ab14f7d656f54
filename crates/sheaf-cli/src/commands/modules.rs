//! `sheaf modules`: rebuild `<buildDir>/src`.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::SheafConfig;
use crate::error::{CliError, Result};
use crate::ui;

pub async fn execute(args: BuildArgs) -> Result<()> {
    let config = SheafConfig::load(&args.project)?;
    let pipeline = utils::build_pipeline(&config)?;

    let result = utils::interruptible(async {
        pipeline.build_modules(config.fork).await.map_err(CliError::from)
    })
    .await;
    pipeline.kill_minifier();
    let report = result?;

    ui::print_modules_summary(&report);
    ui::success(&format!(
        "Modules built in {}",
        ui::format_duration(report.duration)
    ));
    Ok(())
}

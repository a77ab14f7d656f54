//! `sheaf config`: print the config schema or an example file on stdout.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::SheafConfig;
use crate::error::Result;

pub fn execute(args: ConfigArgs) -> Result<()> {
    println!("{}", render(args.action)?);
    Ok(())
}

pub fn render(action: ConfigAction) -> Result<String> {
    match action {
        ConfigAction::Schema => Ok(serde_json::to_string_pretty(&SheafConfig::json_schema())?),
        ConfigAction::Example => SheafConfig::example_config(),
    }
}

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Build mode
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Link sources into the build tree; never compress
    #[value(name = "development", alias = "dev")]
    Development,

    /// Minify modules and bundles
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Bundle selection for `sheaf bundle`
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum TargetSelection {
    /// The main client application (nodebb.min.js by default)
    #[value(name = "client")]
    Client,

    /// The admin control panel (acp.min.js by default)
    #[value(name = "admin", alias = "acp")]
    Admin,

    /// Both bundles, composed concurrently
    #[value(name = "all")]
    All,
}

//! Subscriber setup for binaries embedding the pipeline.
//!
//! The library itself only emits `tracing` events. Programs that do not
//! install their own subscriber can call [`init_logging_from_env`] at startup.
//! Output always goes to stderr: a minify worker owns its stdout.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a filter directive (`debug`, `sheaf_bundler=trace`).
pub const LOG_ENV: &str = "SHEAF_LOG";

/// Directive used when `SHEAF_LOG` is unset, empty or invalid.
const DEFAULT_DIRECTIVE: &str = "info";

static INIT: Once = Once::new();

/// Install a stderr subscriber configured from `SHEAF_LOG`, falling back to
/// `info`. Only the first call in a process has any effect.
///
/// ```rust,no_run
/// sheaf_bundler::logging::init_logging_from_env();
/// ```
pub fn init_logging_from_env() {
    install(filter_from(std::env::var(LOG_ENV).ok().as_deref()));
}

fn filter_from(value: Option<&str>) -> EnvFilter {
    value
        .filter(|directive| !directive.trim().is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    });
}

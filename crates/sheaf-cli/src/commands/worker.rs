//! `sheaf minify-worker`: the process the worker pool spawns.
//!
//! Reads one JSON request per line on stdin and answers one JSON response
//! per line on stdout until stdin closes. Nothing else may write to stdout.

use crate::error::Result;

pub async fn execute() -> Result<()> {
    let served = sheaf_bundler::minify::worker::serve_stdio().await?;
    tracing::debug!(requests = served, "Minify worker exiting");
    Ok(())
}

use super::protocol::WorkerRequest;
use super::{BundleRequest, MinifyExecutor, engine};
use crate::enumerate::ModuleJob;
use crate::{Error, Result};
use async_trait::async_trait;
use futures::future::try_join_all;

/// Runs the engine inside the current process on tokio's blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessExecutor;

impl InProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

/// Execute one request synchronously. Shared by the in-process executor and
/// the worker loop.
pub(crate) fn execute(request: &WorkerRequest) -> Result<()> {
    match request {
        WorkerRequest::MinifyBatch { jobs } => jobs.iter().try_for_each(engine::minify_job),
        WorkerRequest::Bundle { request } => engine::minify_bundle(request),
    }
}

#[async_trait]
impl MinifyExecutor for InProcessExecutor {
    async fn minify_batch(&self, jobs: Vec<ModuleJob>) -> Result<()> {
        if jobs.is_empty() {
            return Ok(());
        }

        // One blocking task per CPU, each working through a contiguous chunk
        let chunks = num_cpus::get().clamp(1, jobs.len());
        let chunk_size = jobs.len().div_ceil(chunks);

        try_join_all(jobs.chunks(chunk_size).map(|chunk| {
            let chunk = chunk.to_vec();
            async move {
                tokio::task::spawn_blocking(move || chunk.iter().try_for_each(engine::minify_job))
                    .await
                    .map_err(Error::from_join)?
            }
        }))
        .await?;
        Ok(())
    }

    async fn bundle(&self, request: BundleRequest) -> Result<()> {
        tokio::task::spawn_blocking(move || engine::minify_bundle(&request))
            .await
            .map_err(Error::from_join)?
    }

    fn kill_all(&self) {}

    fn name(&self) -> &'static str {
        "in-process"
    }
}

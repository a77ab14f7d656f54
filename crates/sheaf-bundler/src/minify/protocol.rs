//! Wire format between the pool and `sheaf minify-worker` processes.
//!
//! One JSON document per line in each direction. Every request is answered by
//! exactly one response before the worker reads the next request.
//!
//! ```text
//! -> {"kind":"minifyBatch","jobs":[{"sourcePath":…,"destinationPath":…,"relativeName":…}]}
//! <- {"status":"done"}
//! -> {"kind":"bundle","request":{"files":[…],"fileName":"nodebb.min.js",…}}
//! <- {"status":"failed","message":"Error minifying nodebb.min.js: …"}
//! ```

use super::BundleRequest;
use crate::enumerate::ModuleJob;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WorkerRequest {
    MinifyBatch { jobs: Vec<ModuleJob> },
    Bundle { request: BundleRequest },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WorkerResponse {
    Done,
    Failed { message: String },
}

impl WorkerRequest {
    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            WorkerRequest::MinifyBatch { jobs } => format!("{} module(s)", jobs.len()),
            WorkerRequest::Bundle { request } => request.file_name.clone(),
        }
    }
}

//! Search engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FilesystemError, Result};
use crate::exclusion::{ExclusionPolicy, DEFAULT_EXCLUDED_NAMES, DEFAULT_EXCLUDED_PATHS};
use crate::types::DEFAULT_MAX_CONCURRENCY;

pub const DEFAULT_WORKER_THREADS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Size of the scan worker pool.
    pub worker_threads: usize,
    /// Scans kept in flight per search unless the request overrides it.
    pub max_concurrency: usize,
    /// Start from the built-in exclusion lists.
    pub use_default_exclusions: bool,
    /// Extra directory basenames never descended into.
    pub exclude_names: Vec<String>,
    /// Extra directory trees never descended into.
    pub exclude_paths: Vec<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            worker_threads: DEFAULT_WORKER_THREADS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            use_default_exclusions: true,
            exclude_names: Vec::new(),
            exclude_paths: Vec::new(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(FilesystemError::InvalidInput(
                "workerThreads must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(FilesystemError::InvalidInput(
                "maxConcurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn exclusion_policy(&self) -> ExclusionPolicy {
        let mut builder = ExclusionPolicy::builder();
        if self.use_default_exclusions {
            builder = builder
                .names(DEFAULT_EXCLUDED_NAMES.iter().copied())
                .paths(DEFAULT_EXCLUDED_PATHS.iter().copied());
        }
        builder
            .names(self.exclude_names.iter().map(String::as_str))
            .paths(self.exclude_paths.iter().cloned())
            .build()
    }
}

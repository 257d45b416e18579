//! Explicitly constructed search state: worker pool and exclusion policy.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use super::coordinator::Coordinator;
use crate::cancel::CancellationToken;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::exclusion::ExclusionPolicy;
use crate::types::{MatchSet, SearchRequest};

/// Owns everything a search needs that outlives a single request.
///
/// Create one per process (or per workspace) and pass it to callers; the
/// pool shuts down when the context is dropped.
pub struct SearchContext {
    pool: ThreadPool,
    policy: Arc<ExclusionPolicy>,
    default_concurrency: usize,
}

impl std::fmt::Debug for SearchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchContext")
            .field("worker_threads", &self.pool.current_num_threads())
            .field("default_concurrency", &self.default_concurrency)
            .field("policy", &self.policy)
            .finish()
    }
}

impl SearchContext {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        Self::with_policy(
            config.worker_threads,
            config.max_concurrency,
            config.exclusion_policy(),
        )
    }

    pub fn with_policy(
        worker_threads: usize,
        default_concurrency: usize,
        policy: ExclusionPolicy,
    ) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_threads.max(1))
            .thread_name(|index| format!("fs-search-{index}"))
            .build()?;
        log::debug!(
            "filesystem search context ready worker_threads={} default_concurrency={}",
            pool.current_num_threads(),
            default_concurrency
        );
        Ok(Self {
            pool,
            policy: Arc::new(policy),
            default_concurrency: default_concurrency.max(1),
        })
    }

    /// Runs `request` to completion on the calling thread's behalf.
    ///
    /// Blocks until the search is found, exhausted or cancelled. Never fails:
    /// unreadable directories are skipped and invalid requests come back as
    /// an empty `Exhausted` set.
    pub fn search(&self, request: &SearchRequest, cancel: &CancellationToken) -> MatchSet {
        Coordinator::new(self, request, cancel).run()
    }

    pub fn policy(&self) -> &ExclusionPolicy {
        &self.policy
    }

    pub(crate) fn policy_handle(&self) -> Arc<ExclusionPolicy> {
        self.policy.clone()
    }

    pub(crate) fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    /// Concurrency applied by callers that do not choose their own.
    pub fn default_concurrency(&self) -> usize {
        self.default_concurrency
    }

    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

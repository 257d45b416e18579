//! Frontier-driven parallel name search.
//!
//! The calling thread owns dispatch: it keeps up to `max_concurrency` scans
//! in flight on the context's pool and blocks on a completion channel
//! between dispatches. Workers merge their own results into the shared
//! frontier and match accumulator, so the coordinator never touches scan
//! results directly.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::context::SearchContext;
use super::frontier::{Frontier, MatchAccumulator};
use crate::cancel::CancellationToken;
use crate::exclusion::ExclusionPolicy;
use crate::scan::{scan_directory, DirKey, ScanOutcome, SkipReason, TargetMatcher};
use crate::types::{MatchSet, SearchRequest, SearchStats, SearchStatus, TerminationPolicy};

/// How long the dispatch loop waits for a completion before re-checking the
/// caller's token.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Lifecycle of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Pending,
    Running,
    Found,
    Exhausted,
    Cancelled,
}

impl SearchPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Found => "found",
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
        }
    }

    fn terminal(status: SearchStatus) -> Self {
        match status {
            SearchStatus::Found => Self::Found,
            SearchStatus::Exhausted => Self::Exhausted,
            SearchStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// State shared between the coordinator and its workers.
#[derive(Debug)]
struct SharedSearch {
    frontier: Frontier,
    matches: MatchAccumulator,
    matcher: TargetMatcher,
    policy: Arc<ExclusionPolicy>,
    /// Fired by the caller's token or by the first match in first-match mode.
    stop: CancellationToken,
    first_match: bool,
    scanned_dirs: AtomicUsize,
    skipped_dirs: AtomicUsize,
    entry_errors: AtomicUsize,
}

impl SharedSearch {
    fn scan(&self, directory: PathBuf) {
        match scan_directory(&directory, &self.matcher, &self.policy, &self.stop) {
            ScanOutcome::Scanned(result) => {
                self.scanned_dirs.fetch_add(1, Ordering::Relaxed);
                self.entry_errors
                    .fetch_add(result.entry_errors, Ordering::Relaxed);
                // Results that land after a stop are ignored.
                if self.stop.is_cancelled() {
                    return;
                }

                if !result.matches.is_empty() {
                    let recorded = self.matches.record(result.matches);
                    if self.first_match && recorded > 0 {
                        self.stop.cancel();
                        return;
                    }
                }

                let policy = &self.policy;
                self.frontier.extend(
                    result
                        .subdirectories
                        .into_iter()
                        .filter(|subdirectory| !policy.is_excluded_path(&subdirectory.path)),
                );
            }
            ScanOutcome::Skipped { directory, reason } => {
                self.skipped_dirs.fetch_add(1, Ordering::Relaxed);
                if reason == SkipReason::AccessDenied {
                    log::debug!("access denied: {}", directory.display());
                }
            }
        }
    }

    fn stats(&self, elapsed: Duration) -> SearchStats {
        SearchStats {
            scanned_dirs: self.scanned_dirs.load(Ordering::Relaxed),
            skipped_dirs: self.skipped_dirs.load(Ordering::Relaxed),
            entry_errors: self.entry_errors.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

pub(crate) struct Coordinator<'a> {
    context: &'a SearchContext,
    request: &'a SearchRequest,
    cancel: &'a CancellationToken,
    phase: SearchPhase,
}

impl<'a> Coordinator<'a> {
    pub(crate) fn new(
        context: &'a SearchContext,
        request: &'a SearchRequest,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            context,
            request,
            cancel,
            phase: SearchPhase::Pending,
        }
    }

    fn transition(&mut self, next: SearchPhase) {
        log::debug!(
            "filesystem search target={} phase={} -> {}",
            self.request.target_name,
            self.phase.as_str(),
            next.as_str()
        );
        self.phase = next;
    }

    /// Returns the root key when the request can be scheduled at all.
    fn admit_root(&self) -> Option<DirKey> {
        let request = self.request;
        if request.is_degenerate() {
            log::debug!("filesystem search rejected: empty target name");
            return None;
        }
        let root = &request.root;
        let metadata = match fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(error) => {
                log::debug!(
                    "filesystem search rejected: root {} unavailable: {}",
                    root.display(),
                    error
                );
                return None;
            }
        };
        if !metadata.is_dir() {
            log::debug!(
                "filesystem search rejected: root {} is not a directory",
                root.display()
            );
            return None;
        }
        if self.context.policy().is_excluded(root) {
            log::debug!(
                "filesystem search rejected: root {} is excluded",
                root.display()
            );
            return None;
        }
        Some(DirKey::from_metadata(root, &metadata))
    }

    pub(crate) fn run(mut self) -> MatchSet {
        let Some(root_key) = self.admit_root() else {
            self.transition(SearchPhase::Exhausted);
            return MatchSet::exhausted_empty();
        };

        let started = Instant::now();
        let request = self.request;
        let first_match = request.policy == TerminationPolicy::FirstMatch;
        let shared = Arc::new(SharedSearch {
            frontier: Frontier::default(),
            matches: MatchAccumulator::new(first_match.then_some(1)),
            matcher: TargetMatcher::from_request(request),
            policy: self.context.policy_handle(),
            stop: self.cancel.child(),
            first_match,
            scanned_dirs: AtomicUsize::new(0),
            skipped_dirs: AtomicUsize::new(0),
            entry_errors: AtomicUsize::new(0),
        });
        shared.frontier.push(request.root.clone(), root_key);

        self.transition(SearchPhase::Running);
        let max_in_flight = request.max_concurrency.max(1);
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let mut in_flight = 0usize;
        let mut interrupted = false;

        loop {
            if shared.stop.is_cancelled() {
                let discarded = shared.frontier.discard_pending();
                log::debug!(
                    "filesystem search stopping: discarded={} in_flight={}",
                    discarded,
                    in_flight
                );
                interrupted = true;
                break;
            }

            while in_flight < max_in_flight {
                let Some(directory) = shared.frontier.pop() else {
                    break;
                };
                in_flight += 1;
                self.dispatch(shared.clone(), directory, done_tx.clone());
            }

            if in_flight == 0 {
                break;
            }

            match done_rx.recv_timeout(POLL_INTERVAL) {
                Ok(()) => in_flight -= 1,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        // In-flight scans finish on their own; their results are already
        // ignored by the stop token.
        while in_flight > 0 && done_rx.recv().is_ok() {
            in_flight -= 1;
        }

        let paths = shared.matches.snapshot();
        let status = if first_match && !paths.is_empty() {
            SearchStatus::Found
        } else if interrupted {
            SearchStatus::Cancelled
        } else if paths.is_empty() {
            SearchStatus::Exhausted
        } else {
            SearchStatus::Found
        };
        self.transition(SearchPhase::terminal(status));

        let stats = shared.stats(started.elapsed());
        log::info!(
            "filesystem search root={} target={} mode={} status={} matches={} scanned_dirs={} skipped_dirs={} entry_errors={} elapsed_ms={}",
            request.root.display(),
            request.target_name,
            request.mode.as_str(),
            status.as_str(),
            paths.len(),
            stats.scanned_dirs,
            stats.skipped_dirs,
            stats.entry_errors,
            stats.elapsed.as_millis(),
        );

        MatchSet {
            status,
            paths,
            stats,
        }
    }

    fn dispatch(&self, shared: Arc<SharedSearch>, directory: PathBuf, done: Sender<()>) {
        self.context.pool().spawn(move || {
            shared.scan(directory);
            // The coordinator may have stopped listening; nothing to do then.
            let _ = done.send(());
        });
    }
}

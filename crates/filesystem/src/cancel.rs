//! Cancellation tokens for search operations.
//!
//! A token is shared between the caller, the coordinator and every worker.
//! Cancelling it (or letting its deadline pass) stops the coordinator from
//! dispatching further scans; scans already running finish on their own.
//!
//! ## Sparse Checking
//!
//! Scanning a single very large directory checks the token only every
//! `CANCEL_CHECK_INTERVAL` entries to keep atomic reads and clock reads out
//! of the per-entry path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often per-entry loops should check whether execution was cancelled.
/// Using a power of 2 allows efficient modulo via bitwise AND.
pub const CANCEL_CHECK_INTERVAL: usize = 0x400; // 1,024

#[derive(Debug)]
struct TokenState {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
    parent: Option<Arc<TokenState>>,
}

impl TokenState {
    fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        if self
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
        {
            return true;
        }
        self.parent
            .as_ref()
            .is_some_and(|parent| parent.is_cancelled())
    }
}

/// A cloneable cancellation token for terminating searches early.
///
/// Clones observe the same state. A child token is cancelled when either it
/// or any of its ancestors is cancelled, but cancelling a child leaves the
/// parent untouched.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    /// Creates a token that is only cancelled by an explicit `cancel()`.
    pub fn new() -> Self {
        Self::from_parts(None, None)
    }

    /// Creates a token that reports cancellation once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::from_parts(Some(deadline), None)
    }

    /// Creates a token that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Creates a token linked to this one.
    pub fn child(&self) -> Self {
        Self::from_parts(None, Some(self.state.clone()))
    }

    fn from_parts(deadline: Option<Instant>, parent: Option<Arc<TokenState>>) -> Self {
        Self {
            state: Arc::new(TokenState {
                cancelled: AtomicBool::new(false),
                deadline,
                parent,
            }),
        }
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once this token, its deadline or an ancestor has fired.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }

    /// Returns `Some(())` while active and `None` once cancelled.
    ///
    /// This enables use with the `?` operator for early returns.
    #[inline]
    pub fn check(&self) -> Option<()> {
        if self.is_cancelled() {
            None
        } else {
            Some(())
        }
    }

    /// Sparse cancellation check - only checks every `CANCEL_CHECK_INTERVAL` iterations.
    #[inline]
    pub fn check_sparse(&self, counter: usize) -> Option<()> {
        if counter & (CANCEL_CHECK_INTERVAL - 1) == 0 {
            self.check()
        } else {
            Some(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_active() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check().is_some());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn child_follows_parent_but_not_the_reverse() {
        let parent = CancellationToken::new();
        let child = parent.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other_child = parent.child();
        parent.cancel();
        assert!(other_child.is_cancelled());
    }

    #[test]
    fn expired_deadline_reports_cancelled() {
        let token = CancellationToken::with_deadline(Instant::now());
        assert!(token.is_cancelled());

        let later = CancellationToken::with_timeout(Duration::from_secs(3600));
        assert!(!later.is_cancelled());
    }

    #[test]
    fn sparse_check_skips_off_interval_counters() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(token.check_sparse(1).is_some());
        assert!(token.check_sparse(0).is_none());
        assert!(token.check_sparse(CANCEL_CHECK_INTERVAL).is_none());
    }
}

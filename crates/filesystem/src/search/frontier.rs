//! Shared work queue and match accumulator for one search.

use std::collections::VecDeque;
use std::path::PathBuf;

use fnv::FnvHashSet;
use parking_lot::Mutex;

use crate::scan::{DirKey, Subdirectory};

/// Directories discovered but not yet scanned.
///
/// Every directory identity is admitted at most once per search, which is
/// what bounds traversal when the tree contains cycles.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    state: Mutex<FrontierState>,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<PathBuf>,
    visited: FnvHashSet<DirKey>,
}

impl Frontier {
    /// Enqueues `path` unless its identity was already admitted.
    pub(crate) fn push(&self, path: PathBuf, key: DirKey) -> bool {
        let mut state = self.state.lock();
        if !state.visited.insert(key) {
            return false;
        }
        state.queue.push_back(path);
        true
    }

    /// Enqueues a batch under a single lock. Returns how many were admitted.
    pub(crate) fn extend<I>(&self, subdirectories: I) -> usize
    where
        I: IntoIterator<Item = Subdirectory>,
    {
        let mut state = self.state.lock();
        let mut admitted = 0;
        for Subdirectory { path, key } in subdirectories {
            if state.visited.insert(key) {
                state.queue.push_back(path);
                admitted += 1;
            }
        }
        admitted
    }

    pub(crate) fn pop(&self) -> Option<PathBuf> {
        self.state.lock().queue.pop_front()
    }

    /// Drops all pending work. Visited identities are kept so discarded
    /// directories cannot be re-admitted by late results.
    pub(crate) fn discard_pending(&self) -> usize {
        let mut state = self.state.lock();
        let pending = state.queue.len();
        state.queue.clear();
        pending
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.state.lock().queue.len()
    }
}

/// Matches accumulated across workers, in completion order.
///
/// Paths are only ever appended; a path seen twice is recorded once.
#[derive(Debug)]
pub(crate) struct MatchAccumulator {
    state: Mutex<MatchState>,
    limit: Option<usize>,
}

#[derive(Debug, Default)]
struct MatchState {
    paths: Vec<PathBuf>,
    seen: FnvHashSet<PathBuf>,
}

impl MatchAccumulator {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            state: Mutex::new(MatchState::default()),
            limit,
        }
    }

    /// Appends unseen paths until the limit is reached. Returns how many
    /// were recorded.
    pub(crate) fn record<I>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut state = self.state.lock();
        let mut recorded = 0;
        for path in paths {
            if self.limit.is_some_and(|limit| state.paths.len() >= limit) {
                break;
            }
            if state.seen.insert(path.clone()) {
                state.paths.push(path);
                recorded += 1;
            }
        }
        recorded
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.state.lock().paths.len()
    }

    pub(crate) fn snapshot(&self) -> Vec<PathBuf> {
        self.state.lock().paths.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subdir(path: &str) -> Subdirectory {
        Subdirectory {
            path: PathBuf::from(path),
            key: DirKey::Path(PathBuf::from(path)),
        }
    }

    #[test]
    fn frontier_admits_each_identity_once() {
        let frontier = Frontier::default();
        assert!(frontier.push(PathBuf::from("/r"), DirKey::Path(PathBuf::from("/r"))));
        assert!(!frontier.push(PathBuf::from("/r"), DirKey::Path(PathBuf::from("/r"))));

        let admitted = frontier.extend(vec![subdir("/r/a"), subdir("/r/b"), subdir("/r/a")]);
        assert_eq!(admitted, 2);
        assert_eq!(frontier.len(), 3);
    }

    #[test]
    fn frontier_is_fifo() {
        let frontier = Frontier::default();
        frontier.extend(vec![subdir("/a"), subdir("/b")]);
        assert_eq!(frontier.pop(), Some(PathBuf::from("/a")));
        assert_eq!(frontier.pop(), Some(PathBuf::from("/b")));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn discarded_directories_stay_visited() {
        let frontier = Frontier::default();
        frontier.extend(vec![subdir("/a"), subdir("/b")]);
        assert_eq!(frontier.discard_pending(), 2);
        assert_eq!(frontier.extend(vec![subdir("/a")]), 0);
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn accumulator_dedups_paths() {
        let matches = MatchAccumulator::new(None);
        assert_eq!(
            matches.record(vec![PathBuf::from("/x"), PathBuf::from("/y")]),
            2
        );
        assert_eq!(matches.record(vec![PathBuf::from("/x")]), 0);
        assert_eq!(
            matches.snapshot(),
            vec![PathBuf::from("/x"), PathBuf::from("/y")]
        );
    }

    #[test]
    fn accumulator_honours_limit() {
        let matches = MatchAccumulator::new(Some(1));
        assert_eq!(
            matches.record(vec![PathBuf::from("/x"), PathBuf::from("/y")]),
            1
        );
        assert_eq!(matches.record(vec![PathBuf::from("/z")]), 0);
        assert_eq!(matches.len(), 1);
    }
}

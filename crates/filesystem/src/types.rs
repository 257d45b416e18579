//! Request and result types for name searches.
//!
//! The tools crate converts these to API payload types for serialization.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of directory scans kept in flight per search.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Which entry types count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    File,
    Folder,
    #[default]
    Either,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
            Self::Either => "either",
        }
    }

    pub fn matches(self, kind: EntryKind) -> bool {
        match self {
            Self::File => kind == EntryKind::File,
            Self::Folder => kind == EntryKind::Directory,
            Self::Either => matches!(kind, EntryKind::File | EntryKind::Directory),
        }
    }
}

/// Entry classification used for matching.
///
/// Symlinks are classified by what they point to; dangling links and
/// special files are `Other` and never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    pub fn from_file_type(file_type: &fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// When the coordinator stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminationPolicy {
    /// Stop as soon as one match is observed and return only that match.
    FirstMatch,
    /// Drain the whole frontier and return every match.
    #[default]
    Exhaustive,
}

/// Terminal status of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Found,
    Exhausted,
    Cancelled,
}

impl SearchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A single name search. Built once, then handed to the coordinator by reference.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub root: PathBuf,
    pub target_name: String,
    pub mode: SearchMode,
    pub policy: TerminationPolicy,
    pub max_concurrency: usize,
    pub case_sensitive: bool,
}

impl SearchRequest {
    pub fn new(root: impl Into<PathBuf>, target_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            target_name: target_name.into(),
            mode: SearchMode::default(),
            policy: TerminationPolicy::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            case_sensitive: true,
        }
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn policy(mut self, policy: TerminationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn first_match(self) -> Self {
        self.policy(TerminationPolicy::FirstMatch)
    }

    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Returns true when the request cannot produce matches and should not
    /// schedule any work.
    pub(crate) fn is_degenerate(&self) -> bool {
        self.target_name.trim().is_empty()
    }
}

/// Counters collected while a search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Directories whose entries were listed.
    pub scanned_dirs: usize,
    /// Directories dispatched but skipped (unreadable, excluded, cancelled).
    pub skipped_dirs: usize,
    /// Individual entries that could not be inspected.
    pub entry_errors: usize,
    /// Wall time from dispatch of the root to the terminal status.
    pub elapsed: Duration,
}

/// Result of a search: terminal status plus matched absolute paths.
///
/// `paths` is in completion order, not filesystem order, and contains no
/// duplicates.
#[derive(Debug, Clone)]
pub struct MatchSet {
    pub status: SearchStatus,
    pub paths: Vec<PathBuf>,
    pub stats: SearchStats,
}

impl MatchSet {
    pub(crate) fn exhausted_empty() -> Self {
        Self {
            status: SearchStatus::Exhausted,
            paths: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// More than one entry shares the target name.
    pub fn is_ambiguous(&self) -> bool {
        self.paths.len() > 1
    }

    pub fn first(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

//! Single-directory scanning.
//!
//! A scan lists the immediate entries of one directory and sorts them into
//! matches and descendable subdirectories. It never recurses: the
//! coordinator owns traversal, which keeps every unit of work bounded.
//!
//! Failures to open the directory are reported as `ScanOutcome::Skipped`
//! rather than errors so a single unreadable directory never aborts a search.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cancel::CancellationToken;
use crate::exclusion::ExclusionPolicy;
use crate::types::{EntryKind, SearchMode, SearchRequest};

/// Physical identity of a directory, used to scan each directory once even
/// when it is reachable through more than one path (bind mounts, hard-linked
/// directories on some filesystems).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirKey {
    #[cfg(unix)]
    Inode { dev: u64, ino: u64 },
    Path(PathBuf),
}

impl DirKey {
    #[cfg(unix)]
    pub fn from_metadata(_path: &Path, metadata: &fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self::Inode {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }
    }

    #[cfg(not(unix))]
    pub fn from_metadata(path: &Path, _metadata: &fs::Metadata) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Decides whether a directory entry is the search target.
#[derive(Debug, Clone)]
pub struct TargetMatcher {
    target: OsString,
    mode: SearchMode,
    case_sensitive: bool,
}

impl TargetMatcher {
    pub fn new(target: impl Into<OsString>, mode: SearchMode, case_sensitive: bool) -> Self {
        Self {
            target: target.into(),
            mode,
            case_sensitive,
        }
    }

    pub fn from_request(request: &SearchRequest) -> Self {
        Self::new(
            request.target_name.trim(),
            request.mode,
            request.case_sensitive,
        )
    }

    #[inline]
    pub fn matches_name(&self, name: &OsStr) -> bool {
        if self.case_sensitive {
            return name == self.target.as_os_str();
        }
        match (name.to_str(), self.target.to_str()) {
            (Some(name), Some(target)) => name.eq_ignore_ascii_case(target),
            _ => name == self.target.as_os_str(),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}

/// A subdirectory discovered by a scan, ready to be enqueued.
#[derive(Debug, Clone)]
pub struct Subdirectory {
    pub path: PathBuf,
    pub key: DirKey,
}

/// Entries found directly inside one directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub matches: Vec<PathBuf>,
    pub subdirectories: Vec<Subdirectory>,
    /// Entries that could not be inspected and were skipped.
    pub entry_errors: usize,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.subdirectories.is_empty()
    }
}

/// Why a directory produced no entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Excluded,
    NotADirectory,
    AccessDenied,
    Io(io::ErrorKind),
    Cancelled,
}

impl SkipReason {
    fn from_io(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            kind => Self::Io(kind),
        }
    }
}

#[derive(Debug)]
pub enum ScanOutcome {
    Scanned(ScanResult),
    Skipped {
        directory: PathBuf,
        reason: SkipReason,
    },
}

impl ScanOutcome {
    /// Collapses a skip into an empty result.
    pub fn into_result(self) -> ScanResult {
        match self {
            Self::Scanned(result) => result,
            Self::Skipped { .. } => ScanResult::default(),
        }
    }

    pub fn is_scanned(&self) -> bool {
        matches!(self, Self::Scanned(_))
    }
}

/// Lists `directory` and classifies its entries.
///
/// Symlinks are matched by the type of their target but are never returned
/// as subdirectories, so traversal cannot follow a link cycle.
pub fn scan_directory(
    directory: &Path,
    matcher: &TargetMatcher,
    policy: &ExclusionPolicy,
    cancel: &CancellationToken,
) -> ScanOutcome {
    let skipped = |reason: SkipReason| ScanOutcome::Skipped {
        directory: directory.to_path_buf(),
        reason,
    };

    if cancel.is_cancelled() {
        return skipped(SkipReason::Cancelled);
    }
    let excluded_name = directory
        .file_name()
        .is_some_and(|name| policy.is_excluded_name(name));
    if excluded_name || policy.is_excluded_path(directory) {
        return skipped(SkipReason::Excluded);
    }

    let read_dir = match fs::read_dir(directory) {
        Ok(iter) => iter,
        Err(error) => {
            log::debug!("skipping {}: {}", directory.display(), error);
            let reason = if directory.is_file() {
                SkipReason::NotADirectory
            } else {
                SkipReason::from_io(&error)
            };
            return skipped(reason);
        }
    };

    let mut result = ScanResult::default();
    for (index, entry) in read_dir.enumerate() {
        if cancel.check_sparse(index).is_none() {
            return skipped(SkipReason::Cancelled);
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                result.entry_errors += 1;
                continue;
            }
        };
        // Does not follow symlinks.
        let Ok(file_type) = entry.file_type() else {
            result.entry_errors += 1;
            continue;
        };
        let name = entry.file_name();

        if matcher.matches_name(&name) {
            let kind = if file_type.is_symlink() {
                fs::metadata(entry.path())
                    .map(|metadata| EntryKind::from_file_type(&metadata.file_type()))
                    .unwrap_or(EntryKind::Other)
            } else {
                EntryKind::from_file_type(&file_type)
            };
            if matcher.mode().matches(kind) {
                result.matches.push(entry.path());
                continue;
            }
        }

        if file_type.is_dir() && !policy.is_excluded_name(&name) {
            let path = entry.path();
            let key = match entry.metadata() {
                Ok(metadata) => DirKey::from_metadata(&path, &metadata),
                Err(_) => {
                    result.entry_errors += 1;
                    DirKey::Path(path.clone())
                }
            };
            result.subdirectories.push(Subdirectory { path, key });
        }
    }

    ScanOutcome::Scanned(result)
}

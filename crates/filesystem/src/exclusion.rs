//! Directories a search never descends into.
//!
//! The policy is built once per search context and shared read-only by every
//! worker, so it carries no interior mutability.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use fnv::FnvHashSet;

/// Basenames excluded wherever they appear: VCS metadata, dependency caches
/// and virtual environments.
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "$RECYCLE.BIN",
    "System Volume Information",
];

/// OS-reserved trees, excluded by absolute path.
#[cfg(target_os = "linux")]
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &["/proc", "/sys", "/dev", "/run", "/snap"];

#[cfg(target_os = "macos")]
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "/dev",
    "/System/Volumes",
    "/private/var/vm",
    "/Volumes/.timemachine",
];

#[cfg(target_os = "windows")]
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &["C:\\Windows"];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &["/dev", "/proc"];

#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    names: FnvHashSet<OsString>,
    paths: Vec<PathBuf>,
}

impl ExclusionPolicy {
    /// A policy that excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in name and path lists for the current platform.
    pub fn platform_default() -> Self {
        Self::builder()
            .names(DEFAULT_EXCLUDED_NAMES.iter().copied())
            .paths(DEFAULT_EXCLUDED_PATHS.iter().copied())
            .build()
    }

    pub fn builder() -> ExclusionPolicyBuilder {
        ExclusionPolicyBuilder::default()
    }

    /// Returns true if `name` alone is enough to exclude a directory.
    #[inline]
    pub fn is_excluded_name(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    /// Returns true if any segment of `path` is an excluded name, or `path`
    /// lies at or below an excluded path.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let by_name = path.components().any(|component| match component {
            Component::Normal(segment) => self.is_excluded_name(segment),
            _ => false,
        });
        by_name || self.is_excluded_path(path)
    }

    /// Path-prefix check only. Cheap enough for the enqueue path because the
    /// list is short.
    #[inline]
    pub fn is_excluded_path(&self, path: &Path) -> bool {
        self.paths.iter().any(|excluded| path.starts_with(excluded))
    }

    pub fn names(&self) -> impl Iterator<Item = &OsStr> {
        self.names.iter().map(OsString::as_os_str)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

#[derive(Debug, Default)]
pub struct ExclusionPolicyBuilder {
    names: FnvHashSet<OsString>,
    paths: Vec<PathBuf>,
}

impl ExclusionPolicyBuilder {
    pub fn name(mut self, name: impl Into<OsString>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.names.insert(name);
        }
        self
    }

    pub fn names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        names.into_iter().fold(self, |builder, name| builder.name(name))
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.as_os_str().is_empty() {
            self.paths.push(path);
        }
        self
    }

    pub fn paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().fold(self, |builder, path| builder.path(path))
    }

    pub fn build(mut self) -> ExclusionPolicy {
        self.paths.sort();
        self.paths.dedup();
        ExclusionPolicy {
            names: self.names,
            paths: self.paths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_by_any_segment_name() {
        let policy = ExclusionPolicy::builder().name("node_modules").build();
        assert!(policy.is_excluded(Path::new("/work/app/node_modules")));
        assert!(policy.is_excluded(Path::new("/work/app/node_modules/react/lib")));
        assert!(!policy.is_excluded(Path::new("/work/app/src")));
        assert!(!policy.is_excluded(Path::new("/work/app/node_modules_backup")));
    }

    #[test]
    fn excludes_by_path_prefix() {
        let policy = ExclusionPolicy::builder().path("/proc").build();
        assert!(policy.is_excluded(Path::new("/proc")));
        assert!(policy.is_excluded(Path::new("/proc/1/fd")));
        assert!(!policy.is_excluded(Path::new("/processes")));
        assert!(!policy.is_excluded(Path::new("/home/proc")));
    }

    #[test]
    fn empty_policy_excludes_nothing() {
        let policy = ExclusionPolicy::empty();
        assert!(!policy.is_excluded(Path::new("/work/.git")));
        assert!(!policy.is_excluded_name(OsStr::new(".git")));
    }

    #[test]
    fn platform_default_covers_vcs_and_caches() {
        let policy = ExclusionPolicy::platform_default();
        for name in [".git", "node_modules", "__pycache__", ".venv"] {
            assert!(policy.is_excluded_name(OsStr::new(name)), "{name}");
        }
        assert!(!policy.is_excluded_name(OsStr::new("src")));
    }

    #[test]
    fn builder_ignores_blank_entries_and_dedups_paths() {
        let policy = ExclusionPolicy::builder()
            .names(["", "build"])
            .paths(["/tmp/a", "/tmp/a", ""])
            .build();
        assert_eq!(policy.names().count(), 1);
        assert_eq!(policy.paths(), &[PathBuf::from("/tmp/a")]);
    }
}

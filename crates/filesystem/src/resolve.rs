//! Symbolic location names and home-directory expansion.

use std::env;
use std::path::{Path, PathBuf};

/// Well-known locations under the home directory, matched case-insensitively.
const HOME_ALIASES: &[(&str, &str)] = &[
    ("home", ""),
    ("desktop", "Desktop"),
    ("documents", "Documents"),
    ("downloads", "Downloads"),
];

/// Returns the current user's home directory, if the environment names one.
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Maps a user-supplied location to a filesystem path.
///
/// Aliases (`desktop`, `Documents`, ...) become home subpaths, `~` prefixes
/// are expanded, and anything else passes through unchanged. Never fails.
pub fn resolve_path(raw: &str) -> PathBuf {
    resolve_with_home(raw, home_dir().as_deref())
}

/// Resolves `raw` and anchors relative results at `base`.
pub fn resolve_path_from(raw: &str, base: &Path) -> PathBuf {
    let resolved = resolve_path(raw);
    if resolved.is_absolute() {
        resolved
    } else {
        base.join(resolved)
    }
}

pub(crate) fn resolve_with_home(raw: &str, home: Option<&Path>) -> PathBuf {
    let trimmed = raw.trim();
    let Some(home) = home else {
        return PathBuf::from(trimmed);
    };

    if let Some((_, subdir)) = HOME_ALIASES
        .iter()
        .find(|(name, _)| trimmed.eq_ignore_ascii_case(name))
    {
        return if subdir.is_empty() {
            home.to_path_buf()
        } else {
            home.join(subdir)
        };
    }

    if trimmed == "~" {
        return home.to_path_buf();
    }
    match trimmed
        .strip_prefix("~/")
        .or_else(|| trimmed.strip_prefix("~\\"))
    {
        Some(rest) => home.join(rest),
        None => PathBuf::from(trimmed),
    }
}

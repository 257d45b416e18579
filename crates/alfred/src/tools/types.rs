use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use filesystem::{MatchSet, SearchStatus};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EntryKindFilter {
    All,
    File,
    Directory,
}

impl EntryKindFilter {
    pub(super) fn parse(raw: Option<&str>) -> CoreResult<Self> {
        match raw.unwrap_or("all") {
            "all" => Ok(Self::All),
            "file" => Ok(Self::File),
            "directory" => Ok(Self::Directory),
            other => Err(CoreError::InvalidInput(format!(
                "unsupported kind: {other} (expected one of: all, file, directory)"
            ))),
        }
    }

    pub(super) fn matches(self, file_type: &fs::FileType) -> bool {
        match self {
            Self::All => true,
            Self::File => file_type.is_file(),
            Self::Directory => file_type.is_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ListSortKey {
    Name,
    Modified,
    Size,
    Type,
}

impl ListSortKey {
    pub(super) fn parse(raw: Option<&str>) -> CoreResult<Self> {
        match raw.unwrap_or("name") {
            "name" => Ok(Self::Name),
            "modified" => Ok(Self::Modified),
            "size" => Ok(Self::Size),
            "type" => Ok(Self::Type),
            other => Err(CoreError::InvalidInput(format!(
                "unsupported sortBy: {other} (expected one of: name, modified, size, type)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub(super) fn parse(raw: Option<&str>) -> CoreResult<Self> {
        match raw.unwrap_or("asc") {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CoreError::InvalidInput(format!(
                "unsupported sortOrder: {other} (expected one of: asc, desc)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum EntryType {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryType {
    pub(super) fn from_file_type(file_type: &fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else if file_type.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FileSystemEntry {
    pub(super) path: String,
    pub(super) name: String,
    #[serde(rename = "type")]
    pub(super) entry_type: EntryType,
    pub(super) size: Option<u64>,
    pub(super) modified_at: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResolvePayload {
    pub(super) input: String,
    pub(super) path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateFolderPayload {
    pub(super) path: String,
    pub(super) created: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateFilePayload {
    pub(super) path: String,
    pub(super) truncated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListPayload {
    pub(super) path: String,
    pub(super) results: Vec<FileSystemEntry>,
    pub(super) count: usize,
    pub(super) errors: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ReadFilePayload {
    pub(super) path: String,
    pub(super) content: String,
    pub(super) offset: u64,
    pub(super) bytes_read: usize,
    pub(super) total_bytes: u64,
    pub(super) truncated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AppendPayload {
    pub(super) path: String,
    pub(super) bytes_written: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchPayload {
    pub(super) target: String,
    pub(super) root: String,
    pub(super) status: SearchStatus,
    pub(super) paths: Vec<String>,
    pub(super) count: usize,
    pub(super) ambiguous: bool,
    pub(super) scanned_dirs: usize,
    pub(super) elapsed_ms: u64,
}

impl SearchPayload {
    pub(super) fn new(target: &str, root: &Path, matches: MatchSet) -> Self {
        let ambiguous = matches.is_ambiguous();
        let paths: Vec<String> = matches.paths.iter().map(|path| display_path(path)).collect();
        Self {
            target: target.to_string(),
            root: display_path(root),
            status: matches.status,
            count: paths.len(),
            paths,
            ambiguous,
            scanned_dirs: matches.stats.scanned_dirs,
            elapsed_ms: u64::try_from(matches.stats.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OpenPayload {
    pub(super) path: String,
    #[serde(rename = "type")]
    pub(super) entry_type: EntryType,
}

pub(super) fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

pub(super) fn build_entry(path: PathBuf, metadata: &fs::Metadata) -> FileSystemEntry {
    let file_type = metadata.file_type();
    FileSystemEntry {
        name: path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .unwrap_or_else(|| display_path(&path)),
        path: display_path(&path),
        entry_type: EntryType::from_file_type(&file_type),
        size: file_type.is_file().then_some(metadata.len()),
        modified_at: modified_secs(metadata),
    }
}

pub(super) fn sort_entries(entries: &mut [FileSystemEntry], key: ListSortKey, order: SortOrder) {
    entries.sort_by(|left, right| {
        let ordering = match key {
            ListSortKey::Name => left.name.cmp(&right.name),
            ListSortKey::Modified => left.modified_at.cmp(&right.modified_at),
            ListSortKey::Size => left.size.cmp(&right.size),
            ListSortKey::Type => type_rank(left.entry_type)
                .cmp(&type_rank(right.entry_type))
                .then_with(|| left.name.cmp(&right.name)),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn type_rank(entry_type: EntryType) -> u8 {
    match entry_type {
        EntryType::Directory => 0,
        EntryType::File => 1,
        EntryType::Symlink => 2,
        EntryType::Other => 3,
    }
}

pub(super) fn modified_secs(metadata: &fs::Metadata) -> Option<u64> {
    metadata
        .modified()
        .ok()
        .and_then(|value| value.duration_since(UNIX_EPOCH).ok())
        .map(|value| value.as_secs())
}

pub(super) fn is_hidden_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|value| value.to_str())
        .map(|value| value.starts_with('.'))
        .unwrap_or(false)
}

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

use super::types::{
    build_entry, display_path, is_hidden_path, sort_entries, AppendPayload, CreateFilePayload,
    CreateFolderPayload, EntryKindFilter, ListPayload, ListSortKey, ReadFilePayload, SortOrder,
};

/// Extensions whose content is not plain text.
const UNSUPPORTED_READ_EXTENSIONS: &[&str] = &["pdf", "docx"];

fn io_error(action: &str, path: &Path, error: io::Error) -> CoreError {
    match error.kind() {
        io::ErrorKind::NotFound => {
            CoreError::NotFound(format!("{action} {}: {error}", path.display()))
        }
        io::ErrorKind::PermissionDenied => {
            CoreError::InvalidInput(format!("{action} {}: {error}", path.display()))
        }
        _ => CoreError::Internal(format!("{action} {}: {error}", path.display())),
    }
}

pub(super) fn create_folder(parent: &Path, name: &str) -> CoreResult<CreateFolderPayload> {
    let path = parent.join(name);
    match fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => {
            return Ok(CreateFolderPayload {
                path: display_path(&path),
                created: false,
            });
        }
        Ok(_) => {
            return Err(CoreError::InvalidInput(format!(
                "path exists and is not a directory: {}",
                path.display()
            )));
        }
        Err(_) => {}
    }

    fs::create_dir_all(&path).map_err(|error| io_error("unable to create folder", &path, error))?;
    log::info!("created folder path={}", path.display());
    Ok(CreateFolderPayload {
        path: display_path(&path),
        created: true,
    })
}

pub(super) fn create_file(parent: &Path, name: &str) -> CoreResult<CreateFilePayload> {
    if !parent.is_dir() {
        return Err(CoreError::NotFound(format!(
            "parent directory does not exist: {}",
            parent.display()
        )));
    }
    let path = parent.join(name);
    let truncated = match fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => {
            return Err(CoreError::InvalidInput(format!(
                "path is a directory: {}",
                path.display()
            )));
        }
        Ok(_) => true,
        Err(_) => false,
    };

    fs::File::create(&path).map_err(|error| io_error("unable to create file", &path, error))?;
    log::info!("created file path={} truncated={}", path.display(), truncated);
    Ok(CreateFilePayload {
        path: display_path(&path),
        truncated,
    })
}

pub(super) fn list_directory_entries(
    path: PathBuf,
    include_hidden: bool,
    kind: EntryKindFilter,
    sort_key: ListSortKey,
    sort_order: SortOrder,
) -> CoreResult<ListPayload> {
    let metadata =
        fs::metadata(&path).map_err(|error| io_error("unable to access path", &path, error))?;
    if !metadata.is_dir() {
        return Err(CoreError::InvalidInput(format!(
            "path is not a directory: {}",
            path.display()
        )));
    }

    let dir_iter =
        fs::read_dir(&path).map_err(|error| io_error("unable to list", &path, error))?;
    let mut results = Vec::new();
    let mut errors = 0usize;
    for child in dir_iter {
        let child = match child {
            Ok(child) => child.path(),
            Err(_) => {
                errors += 1;
                continue;
            }
        };
        if !include_hidden && is_hidden_path(&child) {
            continue;
        }
        let metadata = match fs::symlink_metadata(&child) {
            Ok(metadata) => metadata,
            Err(_) => {
                errors += 1;
                continue;
            }
        };
        if kind.matches(&metadata.file_type()) {
            results.push(build_entry(child, &metadata));
        }
    }

    sort_entries(&mut results, sort_key, sort_order);

    Ok(ListPayload {
        path: display_path(&path),
        count: results.len(),
        results,
        errors,
    })
}

fn has_unsupported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .map(|ext| {
            UNSUPPORTED_READ_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

pub(super) fn read_file_content(
    path: PathBuf,
    offset: u64,
    max_bytes: usize,
) -> CoreResult<ReadFilePayload> {
    if has_unsupported_extension(&path) {
        return Err(CoreError::InvalidInput(format!(
            "unsupported file format: {}",
            path.display()
        )));
    }
    let metadata =
        fs::metadata(&path).map_err(|error| io_error("unable to open file", &path, error))?;
    if !metadata.is_file() {
        return Err(CoreError::InvalidInput(format!(
            "path is not a file: {}",
            path.display()
        )));
    }
    let total_bytes = metadata.len();

    let mut file =
        fs::File::open(&path).map_err(|error| io_error("unable to open file", &path, error))?;
    file.seek(SeekFrom::Start(offset)).map_err(|error| {
        CoreError::Internal(format!(
            "unable to seek file {} at offset {}: {error}",
            path.display(),
            offset
        ))
    })?;

    let mut buffer = Vec::with_capacity(max_bytes.min(total_bytes as usize));
    let bytes_read = file
        .take(max_bytes as u64)
        .read_to_end(&mut buffer)
        .map_err(|error| io_error("unable to read file", &path, error))?;
    let content = String::from_utf8_lossy(&buffer).to_string();
    let truncated = offset.saturating_add(bytes_read as u64) < total_bytes;

    Ok(ReadFilePayload {
        path: display_path(&path),
        content,
        offset,
        bytes_read,
        total_bytes,
        truncated,
    })
}

/// Appends `content` plus a newline. The file must already exist.
pub(super) fn append_to_file(path: &Path, content: &str) -> CoreResult<AppendPayload> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => {
            return Err(CoreError::InvalidInput(format!(
                "path is not a file: {}",
                path.display()
            )));
        }
        Err(_) => {
            return Err(CoreError::NotFound(format!(
                "file does not exist: {}",
                path.display()
            )));
        }
    }

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|error| io_error("unable to open file", path, error))?;
    let mut line = String::with_capacity(content.len() + 1);
    line.push_str(content);
    line.push('\n');
    file.write_all(line.as_bytes())
        .map_err(|error| io_error("unable to append to", path, error))?;
    log::info!("appended path={} bytes={}", path.display(), line.len());

    Ok(AppendPayload {
        path: display_path(path),
        bytes_written: line.len(),
    })
}

//! One `ToolHandler` per `ToolId`.

use std::fs;

use filesystem::{SearchMode, SearchRequest, TerminationPolicy};
use serde::Serialize;
use serde_json::Value;

use crate::context::ToolContext;
use crate::error::{CoreError, CoreResult};

use super::args::{
    bounded_usize, optional_bool, optional_string_ref, optional_u64, required_name,
    required_string, required_text,
};
use super::ops::{
    append_to_file, create_file, create_folder, list_directory_entries, read_file_content,
};
use super::types::{
    display_path, EntryKindFilter, EntryType, ListSortKey, OpenPayload, ResolvePayload,
    SearchPayload, SortOrder,
};
use super::ToolHandler;

const DEFAULT_READ_BYTES: usize = 16 * 1024;
const MAX_READ_BYTES: usize = 1024 * 1024;
const MAX_SEARCH_CONCURRENCY: usize = 256;

fn to_value<T: Serialize>(payload: T) -> CoreResult<Value> {
    serde_json::to_value(payload)
        .map_err(|error| CoreError::Internal(format!("failed to encode payload: {error}")))
}

pub(super) struct ResolvePath;

impl ToolHandler for ResolvePath {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let raw = required_string(input, "path")?;
        let path = cx.resolve(&raw)?;
        to_value(ResolvePayload {
            input: raw,
            path: display_path(&path),
        })
    }
}

pub(super) struct CreateFolder;

impl ToolHandler for CreateFolder {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let name = required_name(input, "folderName")?;
        let parent = cx.resolve(optional_string_ref(input, "path").unwrap_or("."))?;
        to_value(create_folder(&parent, &name)?)
    }
}

pub(super) struct CreateFile;

impl ToolHandler for CreateFile {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let name = required_name(input, "fileName")?;
        let parent = cx.resolve(optional_string_ref(input, "path").unwrap_or("."))?;
        to_value(create_file(&parent, &name)?)
    }
}

pub(super) struct ListFilesAndFolders;

impl ToolHandler for ListFilesAndFolders {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let path = cx.resolve(optional_string_ref(input, "path").unwrap_or("."))?;
        let include_hidden = optional_bool(input, "includeHidden")?.unwrap_or(true);
        let kind = EntryKindFilter::parse(optional_string_ref(input, "kind"))?;
        let sort_key = ListSortKey::parse(optional_string_ref(input, "sortBy"))?;
        let sort_order = SortOrder::parse(optional_string_ref(input, "sortOrder"))?;
        to_value(list_directory_entries(
            path,
            include_hidden,
            kind,
            sort_key,
            sort_order,
        )?)
    }
}

pub(super) struct ReadFileContent;

impl ToolHandler for ReadFileContent {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let path = cx.resolve(&required_string(input, "filePath")?)?;
        let offset = optional_u64(input, "offset")?.unwrap_or(0);
        let max_bytes = bounded_usize(input, "maxBytes", DEFAULT_READ_BYTES, 1, MAX_READ_BYTES)?;
        to_value(read_file_content(path, offset, max_bytes)?)
    }
}

pub(super) struct AppendToFile;

impl ToolHandler for AppendToFile {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let path = cx.resolve(&required_string(input, "filePath")?)?;
        let content = required_text(input, "content")?;
        to_value(append_to_file(&path, content)?)
    }
}

/// Arguments shared by the two search tools.
fn run_search(
    input: &Value,
    cx: &ToolContext,
    name_key: &str,
    mode: SearchMode,
) -> CoreResult<Value> {
    let target = required_string(input, name_key)?;
    let root = cx.search_root(optional_string_ref(input, "searchPath"))?;
    let policy = if optional_bool(input, "firstMatch")?.unwrap_or(false) {
        TerminationPolicy::FirstMatch
    } else {
        TerminationPolicy::Exhaustive
    };
    let case_sensitive = optional_bool(input, "caseSensitive")?.unwrap_or(true);
    let max_concurrency = bounded_usize(
        input,
        "maxConcurrency",
        cx.search_context().default_concurrency(),
        1,
        MAX_SEARCH_CONCURRENCY,
    )?;

    let request = SearchRequest::new(&root, target.as_str())
        .mode(mode)
        .policy(policy)
        .case_sensitive(case_sensitive)
        .max_concurrency(max_concurrency);
    let matches = cx.search(&request);
    to_value(SearchPayload::new(&target, &root, matches))
}

pub(super) struct SearchForFile;

impl ToolHandler for SearchForFile {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        run_search(input, cx, "fileName", SearchMode::File)
    }
}

pub(super) struct SearchForFolder;

impl ToolHandler for SearchForFolder {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        run_search(input, cx, "folderName", SearchMode::Folder)
    }
}

pub(super) struct SearchAndAppendToFile;

impl ToolHandler for SearchAndAppendToFile {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let target = required_string(input, "fileName")?;
        let content = required_text(input, "content")?;
        let root = cx.search_root(optional_string_ref(input, "searchPath"))?;
        let path = cx.locate(&target, SearchMode::File, &root)?;
        to_value(append_to_file(&path, content)?)
    }
}

pub(super) struct OpenFileOrFolder;

impl ToolHandler for OpenFileOrFolder {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let target = required_string(input, "targetName")?;
        let root = cx.search_root(optional_string_ref(input, "searchPath"))?;
        let path = cx.locate(&target, SearchMode::Either, &root)?;
        let entry_type = fs::metadata(&path)
            .map(|metadata| EntryType::from_file_type(&metadata.file_type()))
            .unwrap_or(EntryType::Other);
        cx.launcher().open(&path)?;
        to_value(OpenPayload {
            path: display_path(&path),
            entry_type,
        })
    }
}

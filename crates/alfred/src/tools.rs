//! Tool identifiers, metadata and dispatch.
//!
//! This module provides:
//! - `ToolId`, the closed set of tools
//! - `ToolHandler`, implemented once per tool in `handlers`
//! - `ToolRegistry`, which maps a tool name to its handler

mod args;
mod handlers;
mod ops;
pub mod platform;
mod types;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::context::ToolContext;
use crate::error::{CoreError, CoreResult};

/// Risk classification for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Tool only reads the filesystem.
    Safe,
    /// Tool writes to disk or launches another program.
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    ResolvePath,
    CreateFolder,
    CreateFile,
    ListFilesAndFolders,
    ReadFileContent,
    AppendToFile,
    SearchForFile,
    SearchForFolder,
    SearchAndAppendToFile,
    OpenFileOrFolder,
}

impl ToolId {
    pub const ALL: [ToolId; 10] = [
        ToolId::ResolvePath,
        ToolId::CreateFolder,
        ToolId::CreateFile,
        ToolId::ListFilesAndFolders,
        ToolId::ReadFileContent,
        ToolId::AppendToFile,
        ToolId::SearchForFile,
        ToolId::SearchForFolder,
        ToolId::SearchAndAppendToFile,
        ToolId::OpenFileOrFolder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolId::ResolvePath => "resolve_path",
            ToolId::CreateFolder => "create_folder",
            ToolId::CreateFile => "create_file",
            ToolId::ListFilesAndFolders => "list_files_and_folders",
            ToolId::ReadFileContent => "read_file_content",
            ToolId::AppendToFile => "append_to_file",
            ToolId::SearchForFile => "search_for_file",
            ToolId::SearchForFolder => "search_for_folder",
            ToolId::SearchAndAppendToFile => "search_and_append_to_file",
            ToolId::OpenFileOrFolder => "open_file_or_folder",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolId::ResolvePath => {
                "Resolve a location name such as 'desktop' or '~/notes' to an absolute path."
            }
            ToolId::CreateFolder => "Create a folder, including missing parents.",
            ToolId::CreateFile => "Create an empty file, truncating it if it already exists.",
            ToolId::ListFilesAndFolders => "List the entries of a directory.",
            ToolId::ReadFileContent => "Read a slice of a text file.",
            ToolId::AppendToFile => "Append a line of text to an existing file.",
            ToolId::SearchForFile => "Search a directory tree for files with an exact name.",
            ToolId::SearchForFolder => "Search a directory tree for folders with an exact name.",
            ToolId::SearchAndAppendToFile => {
                "Find a file by name and append a line of text to it."
            }
            ToolId::OpenFileOrFolder => {
                "Find a file or folder by name and open it with the default application."
            }
        }
    }

    pub fn risk_level(self) -> RiskLevel {
        match self {
            ToolId::ResolvePath
            | ToolId::ListFilesAndFolders
            | ToolId::ReadFileContent
            | ToolId::SearchForFile
            | ToolId::SearchForFolder => RiskLevel::Safe,
            ToolId::CreateFolder
            | ToolId::CreateFile
            | ToolId::AppendToFile
            | ToolId::SearchAndAppendToFile
            | ToolId::OpenFileOrFolder => RiskLevel::Confirm,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = CoreError;

    fn from_str(name: &str) -> CoreResult<Self> {
        ToolId::ALL
            .into_iter()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown tool: {name}")))
    }
}

/// A tool implementation: JSON arguments in, JSON payload out.
pub trait ToolHandler: Send + Sync {
    fn execute(&self, input: &Value, cx: &ToolContext) -> CoreResult<Value>;
}

/// Returns the handler for `id`. Adding a `ToolId` variant without a handler
/// fails to compile.
pub fn handler_for(id: ToolId) -> &'static dyn ToolHandler {
    match id {
        ToolId::ResolvePath => &handlers::ResolvePath,
        ToolId::CreateFolder => &handlers::CreateFolder,
        ToolId::CreateFile => &handlers::CreateFile,
        ToolId::ListFilesAndFolders => &handlers::ListFilesAndFolders,
        ToolId::ReadFileContent => &handlers::ReadFileContent,
        ToolId::AppendToFile => &handlers::AppendToFile,
        ToolId::SearchForFile => &handlers::SearchForFile,
        ToolId::SearchForFolder => &handlers::SearchForFolder,
        ToolId::SearchAndAppendToFile => &handlers::SearchAndAppendToFile,
        ToolId::OpenFileOrFolder => &handlers::OpenFileOrFolder,
    }
}

/// Name-based entry point over the static tool table.
pub struct ToolRegistry;

impl ToolRegistry {
    pub fn ids() -> impl Iterator<Item = ToolId> {
        ToolId::ALL.into_iter()
    }

    /// Tool metadata for listing, one object per tool.
    pub fn describe() -> Value {
        let tools: Vec<Value> = Self::ids()
            .map(|id| {
                json!({
                    "name": id.as_str(),
                    "description": id.description(),
                    "riskLevel": id.risk_level(),
                })
            })
            .collect();
        Value::Array(tools)
    }

    pub fn dispatch(name: &str, input: &Value, cx: &ToolContext) -> CoreResult<Value> {
        let id = ToolId::from_str(name)?;
        if !input.is_object() {
            return Err(CoreError::InvalidInput(format!(
                "{id} arguments must be a JSON object"
            )));
        }
        log::debug!("dispatching tool={} risk={:?}", id, id.risk_level());
        handler_for(id).execute(input, cx)
    }
}

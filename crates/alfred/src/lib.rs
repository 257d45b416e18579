//! File tools built on the `filesystem` search core.
//!
//! Each tool takes a JSON object of arguments and returns a JSON payload.
//! Tools are addressed by [`ToolId`] and dispatched through
//! [`ToolRegistry`] against an explicitly constructed [`ToolContext`].

pub mod config;
pub mod context;
pub mod error;
pub mod tools;

pub use config::{load_config, AlfredConfig, AmbiguityPolicy, CONFIG_ENV_VAR};
pub use context::ToolContext;
pub use error::{CoreError, CoreResult};
pub use tools::platform::{Launcher, SystemLauncher};
pub use tools::{handler_for, RiskLevel, ToolHandler, ToolId, ToolRegistry};

use std::fmt;
use std::path::PathBuf;

/// Unified error type for the alfred crate.
#[derive(Debug, Clone)]
pub enum CoreError {
    /// Invalid input provided by the caller.
    InvalidInput(String),
    /// A search or path lookup found nothing.
    NotFound(String),
    /// More than one entry carries the requested name.
    Ambiguous { target: String, paths: Vec<PathBuf> },
    /// A search was stopped before it could finish.
    Cancelled(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            CoreError::NotFound(msg) => write!(f, "not found: {msg}"),
            CoreError::Ambiguous { target, paths } => {
                write!(f, "multiple matches for '{target}':")?;
                for path in paths {
                    write!(f, " {}", path.display())?;
                }
                Ok(())
            }
            CoreError::Cancelled(msg) => write!(f, "cancelled: {msg}"),
            CoreError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl CoreError {
    /// Short machine-readable category, used in JSON error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "invalid_input",
            CoreError::NotFound(_) => "not_found",
            CoreError::Ambiguous { .. } => "ambiguous",
            CoreError::Cancelled(_) => "cancelled",
            CoreError::Internal(_) => "internal",
        }
    }
}

impl From<filesystem::FilesystemError> for CoreError {
    fn from(error: filesystem::FilesystemError) -> Self {
        match error {
            filesystem::FilesystemError::InvalidInput(msg) => CoreError::InvalidInput(msg),
            other => CoreError::Internal(other.to_string()),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

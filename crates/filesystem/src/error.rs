#[derive(Debug, thiserror::Error)]
pub enum FilesystemError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, FilesystemError>;


//! Parallel filesystem name search.
//!
//! This crate provides the search core used by the file tools:
//! - Path resolution for symbolic locations and `~`
//! - A static exclusion policy for VCS, cache and OS directories
//! - A non-recursive directory scanner
//! - A coordinator that explores the tree on a bounded worker pool with
//!   first-match or exhaustive termination and cooperative cancellation

pub mod cancel;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod resolve;
pub mod scan;
pub mod search;
pub mod types;

// Re-export main types
pub use cancel::CancellationToken;
pub use config::SearchConfig;
pub use error::{FilesystemError, Result};
pub use exclusion::ExclusionPolicy;
pub use resolve::{home_dir, resolve_path, resolve_path_from};
pub use scan::{scan_directory, ScanOutcome, ScanResult, SkipReason, TargetMatcher};
pub use search::{SearchContext, SearchPhase};
pub use types::{
    MatchSet, SearchMode, SearchRequest, SearchStats, SearchStatus, TerminationPolicy,
    DEFAULT_MAX_CONCURRENCY,
};

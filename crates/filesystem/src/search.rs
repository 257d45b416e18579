//! Parallel name search.
//!
//! This module provides:
//! - `SearchContext`, the long-lived pool and exclusion policy
//! - The coordinator that drives the frontier for one request

mod context;
mod coordinator;
mod frontier;

#[cfg(test)]
mod tests;

// Re-export main types
pub use context::SearchContext;
pub use coordinator::SearchPhase;

//! Core type definitions shared across the engine
//!
//! - [`BatchConfig`]: traversal and identifier-generation settings
//! - [`IdentifierScope`]: study/series/frame-of-reference/instance UID scopes
//! - [`BatchResult`]: per-file outcomes of a batch run

mod config;
mod outcome;
mod scope;

pub use config::{validate_uid_prefix, BatchConfig, DEFAULT_UID_PREFIX, MAX_UID_PREFIX_LEN};
pub use outcome::{BatchResult, FileOutcome, FileStatus};
pub use scope::IdentifierScope;

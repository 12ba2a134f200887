//! Unified error types for office-image-extractor.
//!
//! File-level failures (validation, dispatch, archive open) surface as
//! [`Error`]; entry-level failures are absorbed by the pipeline and only
//! show up in scan statistics or degraded records.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};

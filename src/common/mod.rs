//! Common types and utilities shared across the extraction layers.

// Submodule declarations
pub mod detection;
pub mod error;
pub mod id;

// Re-exports for convenience
pub use detection::DocumentKind;
pub use error::{Error, Result};

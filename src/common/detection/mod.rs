//! Document kind detection.
//!
//! Dispatch is driven by the file extension; magic-number signatures are used
//! as a secondary check by the legacy fallback.

// Submodule declarations
pub mod types;
pub mod utils;

// Re-exports
pub use types::DocumentKind;
pub use utils::{OLE2_SIGNATURE, ZIP_SIGNATURE, has_signature};

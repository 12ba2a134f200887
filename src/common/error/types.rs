//! Error type shared by the scanner, processor, pipeline and batch layers.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input path exists but is a directory or special file
    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// Input file exceeds the container size ceiling
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// Extension is not one of the recognized Office formats
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Container is not a ZIP archive or is corrupt
    #[error("Failed to open archive: {0}")]
    ArchiveOpen(#[source] zip::result::ZipError),

    /// Media entry stream failed mid-read
    #[error("Failed to read {name}: {reason}")]
    EntryRead { name: String, reason: String },

    /// Media entry stream exceeds the per-image size ceiling
    #[error("{name} exceeds the {limit} byte image limit")]
    EntryTooLarge { name: String, limit: u64 },

    /// Image entry has no bytes
    #[error("Empty image payload: {0}")]
    EmptyPayload(String),

    /// Image bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Thumbnail or payload could not be re-encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Best-effort legacy document conversion failed
    #[error("Failed to extract from legacy document: {0}")]
    LegacyConversion(String),

    /// Background task failed to complete
    #[error("Task failed: {0}")]
    Task(String),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

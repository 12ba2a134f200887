//! The per-image record produced by extraction.

use crate::images::{ImageFormat, Payload};
use serde::Serialize;

/// Extracted image with metadata
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedImage {
    /// Generation-time identifier, unique per record
    pub id: String,
    /// Base file name of the source media entry
    pub name: String,
    /// Decoded source format
    pub format: ImageFormat,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Byte length of the original payload
    pub size: usize,
    /// Bounded JPEG preview; `None` for degraded records
    pub thumbnail: Option<Payload>,
    /// Full payload; `None` when deferred to the payload store
    pub data: Option<Payload>,
    /// Failure message for degraded records
    pub error: Option<String>,
    /// Width or height exceeds the configured maximum dimension
    pub oversized: bool,
}

impl ExtractedImage {
    /// Whether metadata and thumbnail derivation failed for this record.
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Pixel dimensions, when known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

//! Extraction configuration.
//!
//! All tunables live in [`ExtractConfig`], which is passed by value into the
//! extractor. Every field has a serde default so hosts can deserialize a
//! partial JSON or TOML document.

use serde::{Deserialize, Serialize};

/// Default bounding box for thumbnails, in pixels.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;
/// Default oversized-image warning threshold, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;
/// Default JPEG quality for thumbnails and compressed payloads.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;
/// Default container size ceiling (100 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Default per-image size ceiling (50 MiB).
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 50 * 1024 * 1024;
/// Default number of files extracted concurrently by a batch.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Configuration for a single extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Re-encode full-size payloads as JPEG
    #[serde(default)]
    pub compress: bool,

    /// Width or height above which an image is flagged as oversized
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Thumbnail bounding box (square)
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// JPEG quality (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Maximum container size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum size of a single image entry in bytes
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,

    /// Files processed concurrently by a batch
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Keep full payloads in the payload store instead of on each record
    #[serde(default)]
    pub defer_payloads: bool,
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_thumbnail_size() -> u32 {
    DEFAULT_THUMBNAIL_SIZE
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_max_image_size() -> u64 {
    DEFAULT_MAX_IMAGE_SIZE
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            compress: false,
            max_dimension: default_max_dimension(),
            thumbnail_size: default_thumbnail_size(),
            jpeg_quality: default_jpeg_quality(),
            max_file_size: default_max_file_size(),
            max_image_size: default_max_image_size(),
            concurrency: default_concurrency(),
            defer_payloads: false,
        }
    }
}

impl ExtractConfig {
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn with_thumbnail_size(mut self, thumbnail_size: u32) -> Self {
        self.thumbnail_size = thumbnail_size;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_max_image_size(mut self, bytes: u64) -> Self {
        self.max_image_size = bytes;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_defer_payloads(mut self, defer: bool) -> Self {
        self.defer_payloads = defer;
        self
    }

    /// The image-processing subset of this configuration.
    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            compress: self.compress,
            max_dimension: self.max_dimension,
            thumbnail_size: self.thumbnail_size.max(1),
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
        }
    }

    /// Batch concurrency, never less than one.
    #[inline]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Settings consumed by [`crate::images::ImageProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub compress: bool,
    pub max_dimension: u32,
    pub thumbnail_size: u32,
    pub jpeg_quality: u8,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ExtractConfig::default().processor_config()
    }
}

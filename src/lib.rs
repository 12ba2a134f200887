//! office-image-extractor - pull embedded images out of Office documents
//!
//! This library extracts embedded raster images from Office Open XML packages
//! (.docx, .xlsx, .pptx), decodes their metadata and produces bounded JPEG
//! thumbnails suitable for a viewer.
//!
//! # Features
//!
//! - **Lazy scanning**: media entries are read one at a time from the ZIP container
//! - **Degrade, don't drop**: undecodable images still come back with their raw bytes
//! - **Size guards**: container and per-image ceilings bound memory use
//! - **Bounded batches**: many files extracted a few at a time, results in input order
//! - **Deferred payloads**: optionally keep only thumbnails on records and fetch
//!   full images by id on demand
//!
//! Legacy binary formats (.doc, .xls, .ppt) are accepted but only receive
//! best-effort handling: .xls and .ppt yield no images, .doc gets a signature
//! scan for contiguous JPEG/PNG streams.
//!
//! # Example - Extracting one document
//!
//! ```no_run
//! use office_image_extractor::{ExtractConfig, ImageExtractor};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = ImageExtractor::new(ExtractConfig::default());
//! let result = extractor.extract("presentation.pptx").await?;
//!
//! for image in &result.images {
//!     println!("{}: {} ({} bytes)", image.name, image.format, image.size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Batch extraction
//!
//! ```no_run
//! use office_image_extractor::{ExtractConfig, ImageExtractor};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let extractor = ImageExtractor::new(ExtractConfig::default().with_concurrency(3));
//! let report = extractor
//!     .extract_batch(["a.docx", "b.xlsx", "missing.pptx"])
//!     .await;
//!
//! for result in &report.results {
//!     match &result.error {
//!         None => println!("{}: {} images", result.file_name, result.images.len()),
//!         Some(e) => println!("{}: failed: {}", result.file_name, e),
//!     }
//! }
//! println!("{} images total", report.image_count);
//! # }
//! ```

/// Shared error type, document kind detection and identifiers
pub mod common;

/// Extraction configuration
pub mod config;

/// OOXML package scanning
///
/// Opens .docx, .xlsx and .pptx files as ZIP containers and yields the
/// embedded media entries.
pub mod ooxml;

/// Image records, payloads, processing and export
pub mod images;

/// Best-effort handling of .doc, .xls and .ppt
pub mod legacy;

/// Per-file extraction pipeline
pub mod extractor;

/// Bounded-concurrency batch extraction
pub mod batch;

// Re-export commonly used types for convenience
pub use batch::{BatchReport, extract_batch};
pub use common::{DocumentKind, Error, Result};
pub use config::ExtractConfig;
pub use extractor::{ExtractionResult, ImageExtractor, Progress, ProgressCallback};
pub use images::{ExtractedImage, ImageFormat, Payload};
pub use ooxml::{PackageKind, ScanStats};

// Image records, payloads and processing
//
// This module turns raw media bytes pulled from an OOXML package into
// `ExtractedImage` records: decoded metadata, a bounded JPEG thumbnail and the
// full payload (original bytes, or JPEG when compression is requested).
//
// # Architecture
//
// - `processor`: decode, thumbnail and degrade-on-failure logic
// - `extracted`: the `ExtractedImage` record
// - `payload`: encoded byte buffers with their actual encoding
// - `store`: single-use holding area for deferred full payloads
// - `export`: writing payloads to disk
//
// # Example
//
// ```no_run
// use office_image_extractor::config::ProcessorConfig;
// use office_image_extractor::images::ImageProcessor;
//
// let processor = ImageProcessor::new(ProcessorConfig::default());
// let bytes = std::fs::read("image1.png")?;
// let image = processor.process(bytes, "word/media/image1.png")?;
// println!("{} {:?}x{:?}", image.format, image.width, image.height);
// # Ok::<(), office_image_extractor::Error>(())
// ```
pub mod export;
pub mod extracted;
pub mod payload;
pub mod processor;
pub mod store;

pub use export::{save_all, save_image};
pub use extracted::ExtractedImage;
pub use payload::Payload;
pub use processor::{ImageProcessor, fit_within};
pub use store::PayloadStore;

use serde::{Deserialize, Serialize};

/// Image format of a decoded source image or of an encoded payload.
///
/// `Unknown` marks bytes that could not be identified; as a payload encoding
/// it means an opaque octet stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Unknown,
}

impl ImageFormat {
    /// Map a format detected by the `image` crate.
    pub fn from_detected(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Png => Self::Png,
            image::ImageFormat::Jpeg => Self::Jpeg,
            image::ImageFormat::Gif => Self::Gif,
            image::ImageFormat::Bmp => Self::Bmp,
            image::ImageFormat::Tiff => Self::Tiff,
            image::ImageFormat::WebP => Self::Webp,
            _ => Self::Unknown,
        }
    }

    /// Get the lowercase name used in serialized records
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::Unknown => "unknown",
        }
    }

    /// Get the file extension for this format
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::Unknown => "bin",
        }
    }

    /// Get the MIME type for this format
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

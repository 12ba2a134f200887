// Image metadata and thumbnail derivation
//
// Every non-empty buffer produces a record: when decoding, resizing or
// encoding fails the processor falls back to a degraded record carrying the
// raw bytes as an opaque payload.

use crate::common::error::{Error, Result};
use crate::common::id::generate_image_id;
use crate::config::ProcessorConfig;
use crate::images::{ExtractedImage, ImageFormat, Payload};
use crate::ooxml::media::base_name;
use bytes::Bytes;
use image::DynamicImage;
use image::imageops::FilterType;
use jpeg_encoder::{ColorType, Encoder};
use tracing::{debug, warn};

/// Compute thumbnail dimensions that fit inside a `bound`×`bound` box.
///
/// Aspect ratio is preserved and the result never exceeds the source
/// dimensions. Each side is at least one pixel.
pub fn fit_within(width: u32, height: u32, bound: u32) -> (u32, u32) {
    let bound = bound.max(1);
    if width <= bound && height <= bound {
        return (width.max(1), height.max(1));
    }

    let scale = f64::min(
        bound as f64 / width as f64,
        bound as f64 / height as f64,
    );
    let w = ((width as f64 * scale).round() as u32).clamp(1, bound.min(width));
    let h = ((height as f64 * scale).round() as u32).clamp(1, bound.min(height));
    (w, h)
}

/// Encode an image as progressive JPEG, dropping any alpha channel.
pub(crate) fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let (Ok(width), Ok(height)) = (u16::try_from(rgb.width()), u16::try_from(rgb.height())) else {
        return Err(Error::Encode(format!(
            "{}x{} exceeds the JPEG dimension limit",
            rgb.width(),
            rgb.height()
        )));
    };

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, quality);
    encoder.set_progressive(true);
    encoder.encode(rgb.as_raw(), width, height, ColorType::Rgb)?;
    Ok(buffer)
}

/// Successful decode result, before it becomes a record.
struct Decoded {
    format: ImageFormat,
    width: u32,
    height: u32,
    thumbnail: Payload,
    data: Payload,
}

/// Turns raw media bytes into [`ExtractedImage`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProcessor {
    config: ProcessorConfig,
}

impl ImageProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process one image buffer read from `entry_name`.
    ///
    /// # Errors
    /// Only [`Error::EmptyPayload`] for a zero-length buffer. Any other
    /// failure yields a degraded record instead of an error.
    pub fn process(&self, bytes: impl Into<Bytes>, entry_name: &str) -> Result<ExtractedImage> {
        let bytes: Bytes = bytes.into();
        let name = base_name(entry_name).to_string();

        if bytes.is_empty() {
            return Err(Error::EmptyPayload(name));
        }

        let size = bytes.len();
        match self.decode(&bytes) {
            Ok(decoded) => {
                let oversized = decoded.width > self.config.max_dimension
                    || decoded.height > self.config.max_dimension;
                if oversized {
                    warn!(
                        "{} is {}x{}, larger than the {} pixel maximum dimension",
                        name, decoded.width, decoded.height, self.config.max_dimension
                    );
                }

                Ok(ExtractedImage {
                    id: generate_image_id(),
                    name,
                    format: decoded.format,
                    width: Some(decoded.width),
                    height: Some(decoded.height),
                    size,
                    thumbnail: Some(decoded.thumbnail),
                    data: Some(decoded.data),
                    error: None,
                    oversized,
                })
            },
            Err(e) => {
                warn!("Falling back to raw payload for {}: {}", name, e);
                Ok(Self::degraded(name, bytes, e))
            },
        }
    }

    /// Build the fallback record for bytes that could not be processed.
    fn degraded(name: String, bytes: Bytes, error: Error) -> ExtractedImage {
        ExtractedImage {
            id: generate_image_id(),
            name,
            format: ImageFormat::Unknown,
            width: None,
            height: None,
            size: bytes.len(),
            thumbnail: None,
            data: Some(Payload::opaque(bytes)),
            error: Some(error.to_string()),
            oversized: false,
        }
    }

    fn decode(&self, bytes: &Bytes) -> Result<Decoded> {
        let detected = image::guess_format(bytes)?;
        let img = image::load_from_memory_with_format(bytes, detected)?;

        let format = ImageFormat::from_detected(detected);
        let (width, height) = (img.width(), img.height());
        debug!("Decoded {} image {}x{}", format, width, height);

        let thumbnail = self.thumbnail(&img)?;
        let data = if self.config.compress {
            Payload::new(encode_jpeg(&img, self.config.jpeg_quality)?, ImageFormat::Jpeg)
        } else {
            Payload::new(bytes.clone(), format)
        };

        Ok(Decoded {
            format,
            width,
            height,
            thumbnail,
            data,
        })
    }

    fn thumbnail(&self, img: &DynamicImage) -> Result<Payload> {
        let (w, h) = fit_within(img.width(), img.height(), self.config.thumbnail_size);
        let encoded = if (w, h) == (img.width(), img.height()) {
            encode_jpeg(img, self.config.jpeg_quality)?
        } else {
            let resized = img.resize_exact(w, h, FilterType::Lanczos3);
            encode_jpeg(&resized, self.config.jpeg_quality)?
        };
        Ok(Payload::new(encoded, ImageFormat::Jpeg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};
    use proptest::prelude::*;
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: image::ImageFormat) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, format).unwrap();
        buffer.into_inner()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        encode(DynamicImage::ImageRgb8(img), image::ImageFormat::Png)
    }

    fn decoded_dimensions(payload: &Payload) -> (u32, u32) {
        let img = image::load_from_memory(&payload.bytes).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_png_metadata_and_thumbnail() {
        let bytes = png(640, 480);
        let processor = ImageProcessor::default();
        let image = processor.process(bytes.clone(), "word/media/image1.png").unwrap();

        assert_eq!(image.name, "image1.png");
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.dimensions(), Some((640, 480)));
        assert_eq!(image.size, bytes.len());
        assert!(!image.is_degraded());
        assert!(!image.oversized);

        let thumbnail = image.thumbnail.as_ref().unwrap();
        assert_eq!(thumbnail.encoding, ImageFormat::Jpeg);
        assert_eq!(image::guess_format(&thumbnail.bytes).unwrap(), image::ImageFormat::Jpeg);
        assert_eq!(decoded_dimensions(thumbnail), (200, 150));

        let data = image.data.as_ref().unwrap();
        assert_eq!(data.encoding, ImageFormat::Png);
        assert_eq!(&data.bytes[..], &bytes[..]);
    }

    #[test]
    fn test_thumbnail_is_progressive_jpeg() {
        let image = ImageProcessor::default().process(png(320, 240), "image.png").unwrap();
        let thumbnail = &image.thumbnail.as_ref().unwrap().bytes;

        // SOF2 frame header, no baseline SOF0
        assert!(thumbnail.windows(2).any(|w| w == [0xFF, 0xC2]));
        assert!(!thumbnail.windows(2).any(|w| w == [0xFF, 0xC0]));
    }

    #[test]
    fn test_small_image_is_not_enlarged() {
        let processor = ImageProcessor::default();
        let image = processor.process(png(50, 20), "image.png").unwrap();
        assert_eq!(decoded_dimensions(image.thumbnail.as_ref().unwrap()), (50, 20));
    }

    #[test]
    fn test_alpha_source_gets_jpeg_thumbnail() {
        let rgba = ImageBuffer::from_pixel(300, 300, Rgba([10u8, 20, 30, 0]));
        let bytes = encode(DynamicImage::ImageRgba8(rgba), image::ImageFormat::Png);

        let image = ImageProcessor::default().process(bytes, "alpha.png").unwrap();
        assert!(!image.is_degraded());
        assert_eq!(decoded_dimensions(image.thumbnail.as_ref().unwrap()), (200, 200));
    }

    #[test]
    fn test_corrupt_bytes_degrade_to_raw_payload() {
        let bytes = b"definitely not an image".to_vec();
        let image = ImageProcessor::default().process(bytes.clone(), "ppt/media/broken.png").unwrap();

        assert!(image.is_degraded());
        assert_eq!(image.name, "broken.png");
        assert_eq!(image.format, ImageFormat::Unknown);
        assert_eq!(image.dimensions(), None);
        assert!(image.thumbnail.is_none());
        assert_eq!(image.size, bytes.len());
        assert!(image.error.as_deref().unwrap().starts_with("Decode error"));

        let data = image.data.unwrap();
        assert_eq!(data.encoding, ImageFormat::Unknown);
        assert_eq!(&data.bytes[..], &bytes[..]);
    }

    #[test]
    fn test_truncated_png_degrades() {
        let mut bytes = png(64, 64);
        bytes.truncate(40);
        let image = ImageProcessor::default().process(bytes, "cut.png").unwrap();
        assert!(image.is_degraded());
        assert!(image.error.is_some());
    }

    #[test]
    fn test_empty_payload_is_an_error() {
        let result = ImageProcessor::default().process(Vec::new(), "xl/media/empty.png");
        assert!(matches!(result, Err(Error::EmptyPayload(name)) if name == "empty.png"));
    }

    #[test]
    fn test_compress_keeps_source_format() {
        let config = ProcessorConfig {
            compress: true,
            ..ProcessorConfig::default()
        };
        let image = ImageProcessor::new(config).process(png(120, 80), "image.png").unwrap();

        assert_eq!(image.format, ImageFormat::Png);
        let data = image.data.unwrap();
        assert_eq!(data.encoding, ImageFormat::Jpeg);
        assert_eq!(image::guess_format(&data.bytes).unwrap(), image::ImageFormat::Jpeg);
        assert_eq!(decoded_dimensions(&data), (120, 80));
    }

    #[test]
    fn test_oversized_is_advisory() {
        let config = ProcessorConfig {
            max_dimension: 100,
            ..ProcessorConfig::default()
        };
        let image = ImageProcessor::new(config).process(png(150, 40), "wide.png").unwrap();
        assert!(image.oversized);
        assert!(!image.is_degraded());
        assert!(image.thumbnail.is_some());
    }

    #[test]
    fn test_jpeg_source_detected() {
        let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(32, 16, Rgb([200u8, 10, 10])));
        let bytes = encode(img, image::ImageFormat::Jpeg);
        let image = ImageProcessor::default().process(bytes, "photo.jpg").unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.dimensions(), Some((32, 16)));
    }

    #[test]
    fn test_fit_within_examples() {
        assert_eq!(fit_within(640, 480, 200), (200, 150));
        assert_eq!(fit_within(480, 640, 200), (150, 200));
        assert_eq!(fit_within(100, 100, 200), (100, 100));
        assert_eq!(fit_within(4000, 1, 200), (200, 1));
    }

    proptest! {
        #[test]
        fn prop_fit_within_bounds(width in 1u32..10_000, height in 1u32..10_000, bound in 1u32..1_000) {
            let (w, h) = fit_within(width, height, bound);
            prop_assert!(w >= 1 && h >= 1);
            prop_assert!(w <= bound && h <= bound);
            prop_assert!(w <= width && h <= height);
        }
    }
}

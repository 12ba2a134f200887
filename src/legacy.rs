//! Best-effort handling of legacy binary Office formats.
//!
//! Real extraction from .doc, .xls and .ppt is out of scope. Spreadsheets and
//! presentations return no images. Word documents get a signature-carving
//! pass over the raw compound file that recovers JPEG and PNG streams stored
//! contiguously; anything it cannot recognize is ignored.

use crate::common::detection::{DocumentKind, OLE2_SIGNATURE, ZIP_SIGNATURE, has_signature};
use crate::common::error::{Error, Result};
use crate::images::{ExtractedImage, ImageFormat, ImageProcessor};
use memchr::memmem;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

const JPEG_START: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_START: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_END: &[u8] = b"IEND";

/// Carved streams shorter than this are treated as false positives.
const MIN_CARVED_SIZE: usize = 64;

/// Extract what can be recovered from a legacy document.
pub fn extract_legacy(
    kind: DocumentKind,
    path: &Path,
    processor: &ImageProcessor,
) -> Result<Vec<ExtractedImage>> {
    match kind {
        DocumentKind::Xls | DocumentKind::Ppt => {
            debug!("No image extraction for legacy {} files", kind.extension());
            Ok(Vec::new())
        },
        DocumentKind::Doc => {
            let data = std::fs::read(path)?;
            extract_from_doc_bytes(&data, processor)
        },
        other => Err(Error::UnsupportedFormat(format!(
            "{} is not a legacy format",
            other.extension()
        ))),
    }
}

/// Carve embedded images out of the bytes of a .doc compound file.
pub fn extract_from_doc_bytes(data: &[u8], processor: &ImageProcessor) -> Result<Vec<ExtractedImage>> {
    if has_signature(data, ZIP_SIGNATURE) {
        return Err(Error::LegacyConversion(
            "file is a ZIP package, not a compound file; use the .docx extension".to_string(),
        ));
    }
    if !has_signature(data, OLE2_SIGNATURE) {
        return Err(Error::LegacyConversion(
            "missing OLE2 compound file signature".to_string(),
        ));
    }

    let mut images = Vec::new();
    for (format, range) in carve_images(data) {
        let name = format!("image{}.{}", images.len() + 1, format.extension());
        match processor.process(data[range].to_vec(), &name) {
            Ok(image) if !image.is_degraded() => images.push(image),
            // Carving produces false positives; only decodable streams count
            Ok(_) | Err(_) => continue,
        }
    }

    debug!("Carved {} images from legacy document", images.len());
    Ok(images)
}

/// Locate non-overlapping JPEG and PNG streams in `data`, in file order.
pub fn carve_images(data: &[u8]) -> Vec<(ImageFormat, Range<usize>)> {
    let mut found: Vec<(ImageFormat, Range<usize>)> = Vec::new();

    for start in memmem::find_iter(data, JPEG_START) {
        if let Some(end) = jpeg_end(data, start) {
            found.push((ImageFormat::Jpeg, start..end));
        }
    }

    for start in memmem::find_iter(data, PNG_START) {
        if let Some(end) = memmem::find(&data[start + PNG_START.len()..], PNG_END) {
            // IEND tag is followed by its 4-byte CRC
            let end = (start + PNG_START.len() + end + PNG_END.len() + 4).min(data.len());
            found.push((ImageFormat::Png, start..end));
        }
    }

    found.sort_by_key(|(_, range)| range.start);

    let mut carved: Vec<(ImageFormat, Range<usize>)> = Vec::new();
    for (format, range) in found {
        if range.len() < MIN_CARVED_SIZE {
            continue;
        }
        if let Some((_, last)) = carved.last() {
            if range.start < last.end {
                continue;
            }
        }
        carved.push((format, range));
    }
    carved
}

/// Find the end of the JPEG stream whose SOI marker is at `start`.
///
/// Walks the marker segments so that an EOI inside a segment payload (e.g. an
/// EXIF thumbnail in APP1) does not end the stream early. Returns the offset
/// just past the EOI marker, or `None` if the segment chain is malformed.
fn jpeg_end(data: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + 2;
    loop {
        if *data.get(pos)? != 0xFF {
            return None;
        }
        let marker = *data.get(pos + 1)?;
        match marker {
            // Fill byte before a marker
            0xFF => {
                pos += 1;
                continue;
            },
            // EOI
            0xD9 => return Some(pos + 2),
            // Markers without a length field
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            },
            _ => {},
        }

        let length = u16::from_be_bytes([*data.get(pos + 2)?, *data.get(pos + 3)?]) as usize;
        if length < 2 {
            return None;
        }
        pos += 2 + length;

        // SOS: skip entropy-coded data up to the next real marker
        if marker == 0xDA {
            loop {
                pos += memchr::memchr(0xFF, data.get(pos..)?)?;
                match *data.get(pos + 1)? {
                    0x00 | 0xD0..=0xD7 => pos += 2,
                    0xFF => pos += 1,
                    _ => break,
                }
            }
        }
    }
}

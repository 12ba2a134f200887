//! Lazy scanning of media entries in an OOXML package.
//!
//! [`MediaScanner`] opens the package as a ZIP container, plans the matching
//! entries from the central directory without decompressing anything, and
//! then yields one item per planned entry in archive order: the
//! [`MediaEntry`], or the error that dropped it.

use crate::common::error::{Error, Result};
use crate::ooxml::PackageKind;
use phf::phf_set;
use serde::Serialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Raster image extensions extracted from media roots (lowercase).
///
/// Metafiles (emf, wmf) and svg are intentionally absent.
static IMAGE_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "jpg",
    "jpeg",
    "png",
    "gif",
    "bmp",
    "webp",
    "tiff",
};

/// Check whether an entry name ends in a supported raster image extension.
pub fn has_image_extension(entry_name: &str) -> bool {
    let base = base_name(entry_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            IMAGE_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str())
        },
        _ => false,
    }
}

/// Final path component of an archive entry name.
#[inline]
pub(crate) fn base_name(entry_name: &str) -> &str {
    entry_name.rsplit('/').next().unwrap_or(entry_name)
}

/// A media entry read from the package.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    /// Full in-archive path (e.g. `word/media/image1.png`)
    pub name: String,
    /// Uncompressed size declared by the archive header
    pub size_hint: u64,
    /// Uncompressed entry contents
    pub bytes: Vec<u8>,
}

impl MediaEntry {
    /// Base file name of the entry (e.g. `image1.png`).
    #[inline]
    pub fn file_name(&self) -> &str {
        base_name(&self.name)
    }
}

/// Counters describing what a scan (and the processing that follows it) did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Entries under the media root with a supported extension
    pub matched: usize,
    /// Entries turned into image records
    pub processed: usize,
    /// Entries over the per-image size ceiling
    pub skipped_oversize: usize,
    /// Zero-byte entries
    pub skipped_empty: usize,
    /// Entries whose stream failed mid-read
    pub read_failures: usize,
}

/// Planned entry, located from the central directory.
#[derive(Debug, Clone)]
struct Candidate {
    index: usize,
    name: String,
    size: u64,
}

/// Lazy, non-restartable iterator over the media entries of one package.
///
/// Yields exactly [`total`](Self::total) items. An entry whose stream fails
/// or outgrows the size ceiling comes back as [`Error::EntryRead`] or
/// [`Error::EntryTooLarge`] and scanning continues with the next one.
pub struct MediaScanner<R: Read + Seek> {
    archive: ZipArchive<R>,
    kind: PackageKind,
    pending: VecDeque<Candidate>,
    total: usize,
    max_image_size: u64,
    stats: ScanStats,
}

impl MediaScanner<BufReader<File>> {
    /// Open a package file for scanning.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be opened and
    /// [`Error::ArchiveOpen`] if it is not a readable ZIP container.
    pub fn open<P: AsRef<Path>>(path: P, kind: PackageKind, max_image_size: u64) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), kind, max_image_size)
    }
}

impl<R: Read + Seek> MediaScanner<R> {
    /// Create a scanner over any seekable reader holding a ZIP container.
    pub fn from_reader(reader: R, kind: PackageKind, max_image_size: u64) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).map_err(Error::ArchiveOpen)?;

        let mut pending = VecDeque::new();
        let mut stats = ScanStats::default();

        for index in 0..archive.len() {
            // Raw access reads only the local header, never the compressed data
            let entry = match archive.by_index_raw(index) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable archive entry #{}: {}", index, e);
                    continue;
                },
            };

            if entry.is_dir() || !kind.is_media_entry(entry.name()) {
                continue;
            }

            stats.matched += 1;
            let size = entry.size();
            if size > max_image_size {
                warn!(
                    "Skipping {}: {} bytes exceeds the {} byte image limit",
                    entry.name(),
                    size,
                    max_image_size
                );
                stats.skipped_oversize += 1;
                continue;
            }

            pending.push_back(Candidate {
                index,
                name: entry.name().to_string(),
                size,
            });
        }

        let total = pending.len();
        debug!(
            "Planned {} media entries under {} ({} matched)",
            total,
            kind.media_root(),
            stats.matched
        );

        Ok(Self {
            archive,
            kind,
            pending,
            total,
            max_image_size,
            stats,
        })
    }

    /// Number of items this scanner yields.
    ///
    /// Fixed once the scanner is created.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Package kind being scanned.
    #[inline]
    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    /// Counters accumulated so far.
    #[inline]
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Read one planned entry, bounded by the image size ceiling.
    ///
    /// Returns `Ok(None)` when the stream turns out to be larger than its
    /// header declared and the ceiling allows.
    fn read_candidate(&mut self, candidate: &Candidate) -> Result<Option<MediaEntry>> {
        let mut entry = self.archive.by_index(candidate.index)?;

        let limit = self.max_image_size;
        let capacity = candidate.size.min(limit) as usize;
        let mut bytes = Vec::with_capacity(capacity);
        entry.by_ref().take(limit.saturating_add(1)).read_to_end(&mut bytes)?;

        if bytes.len() as u64 > limit {
            return Ok(None);
        }

        Ok(Some(MediaEntry {
            name: candidate.name.clone(),
            size_hint: candidate.size,
            bytes,
        }))
    }
}

impl<R: Read + Seek> Iterator for MediaScanner<R> {
    type Item = Result<MediaEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.pending.pop_front()?;
        let item = match self.read_candidate(&candidate) {
            Ok(Some(entry)) => Ok(entry),
            Ok(None) => {
                self.stats.skipped_oversize += 1;
                Err(Error::EntryTooLarge {
                    name: candidate.name,
                    limit: self.max_image_size,
                })
            },
            Err(e) => {
                self.stats.read_failures += 1;
                Err(Error::EntryRead {
                    name: candidate.name,
                    reason: e.to_string(),
                })
            },
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pending.len(), Some(self.pending.len()))
    }
}

impl<R: Read + Seek> ExactSizeIterator for MediaScanner<R> {}

impl<R: Read + Seek> std::fmt::Debug for MediaScanner<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaScanner")
            .field("kind", &self.kind)
            .field("total", &self.total)
            .field("pending", &self.pending.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip_data = Vec::new();
        {
            let cursor = Cursor::new(&mut zip_data);
            let mut writer = ZipWriter::new(cursor);
            // Stored entries keep their bytes addressable for corruption
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

            for (name, data) in entries {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }

            writer.finish().unwrap();
        }
        zip_data
    }

    #[test]
    fn test_extension_filter() {
        assert!(has_image_extension("word/media/image1.PNG"));
        assert!(has_image_extension("a.tiff"));
        assert!(has_image_extension("x/y.WebP"));
        assert!(!has_image_extension("word/media/image1.emf"));
        assert!(!has_image_extension("word/media/image1.svg"));
        assert!(!has_image_extension("word/media/png"));
        assert!(!has_image_extension("word/media.png/readme"));
    }

    #[test]
    fn test_yields_matching_entries_in_archive_order() {
        let data = build_zip(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("ppt/media/image3.png", b"three"),
            ("ppt/slides/slide1.xml", b"<sld/>"),
            ("ppt/media/image1.jpeg", b"one"),
            ("ppt/media/image2.emf", b"metafile"),
            ("word/media/image9.png", b"wrong root"),
            ("ppt/media/image2.gif", b"two"),
        ]);

        let scanner = MediaScanner::from_reader(Cursor::new(data), PackageKind::Pptx, 1024).unwrap();
        assert_eq!(scanner.total(), 3);

        let names: Vec<String> = scanner.map(|e| e.unwrap().file_name().to_string()).collect();
        assert_eq!(names, vec!["image3.png", "image1.jpeg", "image2.gif"]);
    }

    #[test]
    fn test_entry_contents_and_size_hint() {
        let data = build_zip(&[("xl/media/image1.png", b"payload")]);
        let mut scanner = MediaScanner::from_reader(Cursor::new(data), PackageKind::Xlsx, 1024).unwrap();

        let entry = scanner.next().unwrap().unwrap();
        assert_eq!(entry.name, "xl/media/image1.png");
        assert_eq!(entry.bytes, b"payload");
        assert_eq!(entry.size_hint, 7);
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_oversized_entries_are_skipped_and_counted() {
        let big = vec![0u8; 100];
        let data = build_zip(&[
            ("word/media/big.png", big.as_slice()),
            ("word/media/small.png", b"tiny"),
        ]);

        let mut scanner = MediaScanner::from_reader(Cursor::new(data), PackageKind::Docx, 10).unwrap();
        assert_eq!(scanner.total(), 1);

        let entries: Vec<MediaEntry> = scanner.by_ref().collect::<Result<_>>().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name(), "small.png");

        let stats = scanner.stats();
        assert_eq!(stats.matched, 2);
        assert_eq!(stats.skipped_oversize, 1);
        assert_eq!(stats.read_failures, 0);
    }

    fn find(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).position(|w| w == needle).unwrap()
    }

    /// Rewrite the uncompressed size recorded for `name` in the central directory.
    fn patch_declared_size(zip_data: &mut [u8], name: &str, size: u32) {
        let mut offset = 0;
        loop {
            let header = offset + find(&zip_data[offset..], b"PK\x01\x02");
            if zip_data[header + 46..].starts_with(name.as_bytes()) {
                zip_data[header + 24..header + 28].copy_from_slice(&size.to_le_bytes());
                return;
            }
            offset = header + 4;
        }
    }

    #[test]
    fn test_read_failure_drops_only_that_entry() {
        let mut data = build_zip(&[
            ("ppt/media/image1.png", b"first payload"),
            ("ppt/media/image2.png", b"CORRUPTED PAYLOAD"),
            ("ppt/media/image3.png", b"third payload"),
        ]);
        // Break the CRC of the middle entry
        let at = find(&data, b"CORRUPTED PAYLOAD");
        data[at] ^= 0xFF;

        let mut scanner = MediaScanner::from_reader(Cursor::new(data), PackageKind::Pptx, 1024).unwrap();
        assert_eq!(scanner.total(), 3);

        let items: Vec<Result<MediaEntry>> = scanner.by_ref().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().bytes, b"first payload");
        assert!(matches!(&items[1], Err(Error::EntryRead { name, .. }) if name == "ppt/media/image2.png"));
        assert_eq!(items[2].as_ref().unwrap().bytes, b"third payload");

        let stats = scanner.stats();
        assert_eq!(stats.read_failures, 1);
        assert_eq!(stats.skipped_oversize, 0);
    }

    #[test]
    fn test_stream_larger_than_declared_is_capped() {
        let big = vec![7u8; 64];
        let mut data = build_zip(&[
            ("word/media/liar.png", big.as_slice()),
            ("word/media/honest.png", b"tiny"),
        ]);
        patch_declared_size(&mut data, "word/media/liar.png", 4);

        let mut scanner = MediaScanner::from_reader(Cursor::new(data), PackageKind::Docx, 16).unwrap();
        assert_eq!(scanner.total(), 2);

        let first = scanner.next().unwrap();
        assert!(matches!(first, Err(Error::EntryTooLarge { limit: 16, .. })));
        assert_eq!(scanner.next().unwrap().unwrap().file_name(), "honest.png");
        assert!(scanner.next().is_none());
        assert_eq!(scanner.stats().skipped_oversize, 1);
    }

    #[test]
    fn test_not_a_zip_is_archive_open_error() {
        let result = MediaScanner::from_reader(
            Cursor::new(b"this is not a zip archive".to_vec()),
            PackageKind::Docx,
            1024,
        );
        assert!(matches!(result, Err(Error::ArchiveOpen(_))));
    }

    #[test]
    fn test_empty_media_root() {
        let data = build_zip(&[("xl/workbook.xml", b"<workbook/>")]);
        let mut scanner = MediaScanner::from_reader(Cursor::new(data), PackageKind::Xlsx, 1024).unwrap();
        assert_eq!(scanner.total(), 0);
        assert!(scanner.next().is_none());
    }
}

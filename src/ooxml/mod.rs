//! Office Open XML (OOXML) package access.
//!
//! OOXML documents (.docx, .xlsx, .pptx) are ZIP containers following the
//! Open Packaging Conventions. Embedded raster media for each document type
//! lives under a fixed directory:
//!
//! | Package | Media root |
//! |---------|------------|
//! | docx    | `word/media/` |
//! | xlsx    | `xl/media/` |
//! | pptx    | `ppt/media/` |
//!
//! # Example
//!
//! ```rust,no_run
//! use office_image_extractor::ooxml::{MediaScanner, PackageKind};
//!
//! let scanner = MediaScanner::open("deck.pptx", PackageKind::Pptx, 50 * 1024 * 1024)?;
//! for entry in scanner {
//!     let entry = entry?;
//!     println!("{} ({} bytes)", entry.name, entry.bytes.len());
//! }
//! # Ok::<(), office_image_extractor::Error>(())
//! ```
pub mod media;

pub use media::{MediaEntry, MediaScanner, ScanStats, has_image_extension};

/// OOXML package type, selecting the media root to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    Docx,
    Xlsx,
    Pptx,
}

impl PackageKind {
    /// In-archive directory holding embedded media.
    pub const fn media_root(self) -> &'static str {
        match self {
            PackageKind::Docx => "word/media/",
            PackageKind::Xlsx => "xl/media/",
            PackageKind::Pptx => "ppt/media/",
        }
    }

    /// Whether an archive entry name is a supported image under this package's media root.
    pub fn is_media_entry(self, entry_name: &str) -> bool {
        entry_name.starts_with(self.media_root()) && has_image_extension(entry_name)
    }
}

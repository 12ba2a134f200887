//! Document kind enumeration.

use crate::ooxml::PackageKind;
use std::path::Path;

/// Office document kinds recognized by the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Microsoft Word Document (OLE2 format, .doc)
    Doc,
    /// Microsoft Word Document (OOXML format, .docx)
    Docx,
    /// Microsoft Excel Spreadsheet (OLE2 format, .xls)
    Xls,
    /// Microsoft Excel Spreadsheet (OOXML format, .xlsx)
    Xlsx,
    /// Microsoft PowerPoint Presentation (OLE2 format, .ppt)
    Ppt,
    /// Microsoft PowerPoint Presentation (OOXML format, .pptx)
    Pptx,
}

impl DocumentKind {
    /// Map a file extension (without the dot, any case) to a document kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            "ppt" => Some(Self::Ppt),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect the kind from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// The OOXML package kind, or `None` for legacy binary formats.
    pub fn package_kind(self) -> Option<PackageKind> {
        match self {
            Self::Docx => Some(PackageKind::Docx),
            Self::Xlsx => Some(PackageKind::Xlsx),
            Self::Pptx => Some(PackageKind::Pptx),
            Self::Doc | Self::Xls | Self::Ppt => None,
        }
    }

    /// Canonical extension for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Docx => "docx",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Ppt => "ppt",
            Self::Pptx => "pptx",
        }
    }
}

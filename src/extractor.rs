//! Per-file extraction pipeline.
//!
//! [`ImageExtractor`] validates an input path, dispatches on its extension,
//! drives the scan → process loop for OOXML packages and aggregates the
//! records into an [`ExtractionResult`].
//!
//! # Example
//!
//! ```rust,no_run
//! use office_image_extractor::{ExtractConfig, ImageExtractor};
//!
//! # async fn run() -> office_image_extractor::Result<()> {
//! let extractor = ImageExtractor::new(ExtractConfig::default())
//!     .with_progress(|p| println!("{}: {}/{}", p.file, p.processed, p.total));
//!
//! let result = extractor.extract("report.docx").await?;
//! for image in &result.images {
//!     println!("{} {} {:?}x{:?}", image.name, image.format, image.width, image.height);
//! }
//! # Ok(())
//! # }
//! ```

use crate::common::detection::DocumentKind;
use crate::common::error::{Error, Result};
use crate::config::ExtractConfig;
use crate::images::{ExtractedImage, ImageProcessor, Payload, PayloadStore};
use crate::legacy;
use crate::ooxml::{MediaScanner, PackageKind, ScanStats};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Progress notification, delivered once per planned entry.
///
/// Dropped entries (read failures, oversize streams, empty payloads) are
/// reported too, so the last notification for a file has `processed == total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// File name of the document being extracted
    pub file: String,
    /// Entries handled so far (strictly increasing)
    pub processed: usize,
    /// Entries planned for this document (fixed)
    pub total: usize,
}

/// Progress callback shared between extraction tasks.
pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Outcome of extracting one file.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub file_name: String,
    pub file_path: PathBuf,
    pub success: bool,
    /// Records in archive order
    pub images: Vec<ExtractedImage>,
    /// File-level failure message when `success` is false
    pub error: Option<String>,
    pub stats: ScanStats,
}

impl ExtractionResult {
    fn succeeded(path: &Path, images: Vec<ExtractedImage>, stats: ScanStats) -> Self {
        Self {
            file_name: display_name(path),
            file_path: path.to_path_buf(),
            success: true,
            images,
            error: None,
            stats,
        }
    }

    /// Failed result for a file-level error.
    pub fn from_error(path: &Path, error: &Error) -> Self {
        Self {
            file_name: display_name(path),
            file_path: path.to_path_buf(),
            success: false,
            images: Vec::new(),
            error: Some(error.to_string()),
            stats: ScanStats::default(),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lexically normalize `path` into an absolute path without `.` or `..`.
pub(crate) fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                normalized.pop();
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Check that `path` names a regular file no larger than `max_file_size`.
///
/// # Returns
/// The normalized path.
pub fn validate_path(path: &Path, max_file_size: u64) -> Result<PathBuf> {
    let path = normalize_path(path)?;

    let metadata = match std::fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound(path));
        },
        Err(e) => return Err(Error::Io(e)),
    };

    if !metadata.is_file() {
        return Err(Error::NotAFile(path));
    }

    if metadata.len() > max_file_size {
        return Err(Error::FileTooLarge {
            size: metadata.len(),
            limit: max_file_size,
        });
    }

    Ok(path)
}

/// Image extraction pipeline for Office documents.
///
/// Cheap to clone; clones share the payload store and progress callback.
#[derive(Clone)]
pub struct ImageExtractor {
    config: ExtractConfig,
    processor: ImageProcessor,
    progress: Option<ProgressCallback>,
    store: Arc<PayloadStore>,
}

impl ImageExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        let processor = ImageProcessor::new(config.processor_config());
        Self {
            config,
            processor,
            progress: None,
            store: Arc::new(PayloadStore::new()),
        }
    }

    /// Attach a progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    #[inline]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Store holding deferred full payloads.
    #[inline]
    pub fn store(&self) -> &PayloadStore {
        &self.store
    }

    /// Retrieve a deferred full payload by image id. Succeeds at most once.
    pub fn take_payload(&self, id: &str) -> Option<Payload> {
        self.store.take(id)
    }

    /// Extract images from one file on the blocking thread pool.
    ///
    /// # Errors
    /// File-level failures only: validation, unsupported extension, archive
    /// open errors and legacy conversion errors. Per-image problems are
    /// reflected in the records and stats instead.
    pub async fn extract<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionResult> {
        let this = self.clone();
        let path = path.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || this.extract_blocking(&path)).await?
    }

    /// Extract images from one file and fold any error into the result.
    pub async fn extract_or_failure<P: AsRef<Path>>(&self, path: P) -> ExtractionResult {
        let path = path.as_ref();
        match self.extract(path).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Extraction failed for {}: {}", path.display(), e);
                ExtractionResult::from_error(path, &e)
            },
        }
    }

    /// Extract images from an in-memory document.
    ///
    /// The buffer is staged in a temporary directory under `file_name`, whose
    /// extension selects the format. The staged file is removed whatever the
    /// outcome.
    pub async fn extract_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<ExtractionResult> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| Error::UnsupportedFormat(file_name.to_string()))?
            .to_owned();

        let staging = tempfile::tempdir()?;
        let staged = staging.path().join(&name);
        tokio::fs::write(&staged, bytes).await?;

        let mut result = self.extract(&staged).await?;
        result.file_path = PathBuf::from(file_name);
        Ok(result)
    }

    /// Synchronous extraction of one file.
    pub fn extract_blocking(&self, path: &Path) -> Result<ExtractionResult> {
        let path = validate_path(path, self.config.max_file_size)?;

        let kind = DocumentKind::from_path(&path).ok_or_else(|| {
            let ext = path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default();
            Error::UnsupportedFormat(if ext.is_empty() { "(none)".to_string() } else { ext })
        })?;

        debug!("Extracting {:?} from {}", kind, path.display());

        match kind.package_kind() {
            Some(package) => {
                let (images, stats) = self.extract_package(&path, package)?;
                Ok(ExtractionResult::succeeded(&path, images, stats))
            },
            None => {
                let mut images = legacy::extract_legacy(kind, &path, &self.processor)?;
                self.defer(&mut images);
                let stats = ScanStats {
                    matched: images.len(),
                    processed: images.len(),
                    ..ScanStats::default()
                };
                Ok(ExtractionResult::succeeded(&path, images, stats))
            },
        }
    }

    fn extract_package(
        &self,
        path: &Path,
        package: PackageKind,
    ) -> Result<(Vec<ExtractedImage>, ScanStats)> {
        let mut scanner = MediaScanner::open(path, package, self.config.max_image_size)?;
        let total = scanner.total();
        let label = display_name(path);

        let mut images = Vec::with_capacity(total);
        let mut handled = 0;
        let mut skipped_empty = 0;
        let mut failures = 0;

        for item in scanner.by_ref() {
            match item {
                Ok(entry) => match self.processor.process(entry.bytes, &entry.name) {
                    Ok(image) => images.push(image),
                    Err(Error::EmptyPayload(name)) => {
                        warn!("Skipping empty image entry {}", name);
                        skipped_empty += 1;
                    },
                    Err(e) => {
                        warn!("Skipping {}: {}", entry.name, e);
                        failures += 1;
                    },
                },
                // Already counted in the scanner's stats
                Err(e) => warn!("Dropping media entry: {}", e),
            }

            handled += 1;
            self.report(&label, handled, total);
        }

        self.defer(&mut images);

        let mut stats = scanner.stats();
        stats.processed = images.len();
        stats.skipped_empty += skipped_empty;
        stats.read_failures += failures;

        debug!(
            "Extracted {} images from {} ({} planned)",
            images.len(),
            label,
            total
        );
        Ok((images, stats))
    }

    /// Move full payloads into the store when payloads are deferred.
    fn defer(&self, images: &mut [ExtractedImage]) {
        if !self.config.defer_payloads {
            return;
        }
        for image in images.iter_mut() {
            if let Some(payload) = image.data.take() {
                self.store.insert(image.id.clone(), payload);
            }
        }
    }

    fn report(&self, file: &str, processed: usize, total: usize) {
        if let Some(callback) = &self.progress {
            callback(&Progress {
                file: file.to_string(),
                processed,
                total,
            });
        }
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl std::fmt::Debug for ImageExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageExtractor")
            .field("config", &self.config)
            .field("has_progress", &self.progress.is_some())
            .field("store", &self.store)
            .finish()
    }
}

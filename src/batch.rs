//! Bounded-concurrency extraction over many files.
//!
//! Files are processed in consecutive groups of at most `concurrency` files.
//! A group fully completes before the next one starts, and results always
//! come back in input order.

use crate::common::error::{Error, Result};
use crate::extractor::{ExtractionResult, ImageExtractor};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Per-file results of a batch plus aggregate counts.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One result per input path, in input order
    pub results: Vec<ExtractionResult>,
    pub succeeded: usize,
    pub failed: usize,
    /// Images across all successful files
    pub image_count: usize,
}

impl BatchReport {
    pub fn new(results: Vec<ExtractionResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        let image_count = results.iter().map(|r| r.images.len()).sum();
        Self {
            failed: results.len() - succeeded,
            succeeded,
            image_count,
            results,
        }
    }

    #[inline]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run `f` over `items` in groups of `limit`, each item on its own task.
///
/// Group *i* completes before group *i + 1* starts, so no more than `limit`
/// futures are in flight. Outputs are returned in input order; a task that
/// panics yields [`Error::Task`] in its slot without affecting its siblings.
pub async fn run_grouped<T, F, Fut, O>(items: Vec<T>, limit: usize, mut f: F) -> Vec<Result<O>>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = O> + Send + 'static,
    O: Send + 'static,
{
    let limit = limit.max(1);
    let mut outputs = Vec::with_capacity(items.len());
    let mut items = items.into_iter();
    let mut group_index = 0;

    loop {
        let handles: Vec<_> = items.by_ref().take(limit).map(|item| tokio::spawn(f(item))).collect();
        if handles.is_empty() {
            break;
        }

        debug!("Running group {} with {} tasks", group_index, handles.len());
        for handle in handles {
            outputs.push(handle.await.map_err(Error::from));
        }
        group_index += 1;
    }

    outputs
}

/// Extract images from every path with the extractor's concurrency limit.
///
/// Never fails as a whole: each file's error becomes a failed entry in the
/// report. No retries are attempted.
pub async fn extract_batch<I, P>(extractor: &ImageExtractor, paths: I) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let paths: Vec<PathBuf> = paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
    let limit = extractor.config().effective_concurrency();
    debug!("Extracting {} files, {} at a time", paths.len(), limit);

    let outcomes = run_grouped(paths.clone(), limit, |path| {
        let extractor = extractor.clone();
        async move { extractor.extract_or_failure(&path).await }
    })
    .await;

    let results = outcomes
        .into_iter()
        .zip(&paths)
        .map(|(outcome, path)| {
            outcome.unwrap_or_else(|e| {
                warn!("Extraction task for {} did not complete: {}", path.display(), e);
                ExtractionResult::from_error(path, &e)
            })
        })
        .collect();

    BatchReport::new(results)
}

impl ImageExtractor {
    /// Extract images from many files. See [`extract_batch`].
    pub async fn extract_batch<I, P>(&self, paths: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        extract_batch(self, paths).await
    }
}

//! Writing extracted payloads to disk.

use crate::common::error::Result;
use crate::images::{ExtractedImage, Payload};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write one payload to `path`.
pub fn save_image<P: AsRef<Path>>(payload: &Payload, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, &payload.bytes)?;
    debug!("Saved {} bytes to {}", payload.len(), path.display());
    Ok(())
}

/// Write every record that carries an inline payload into `dir`.
///
/// Files are named `image_{n}.{ext}` where `n` is the 1-based position of the
/// record in `images` and `ext` follows the payload encoding. Records
/// without inline data (deferred payloads) are skipped. The directory is
/// created if needed.
///
/// # Returns
/// Paths of the files written, in record order.
pub fn save_all<P: AsRef<Path>>(images: &[ExtractedImage], dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut saved = Vec::with_capacity(images.len());
    for (i, image) in images.iter().enumerate() {
        let Some(payload) = &image.data else {
            continue;
        };
        let path = dir.join(format!("image_{}.{}", i + 1, payload.extension()));
        save_image(payload, &path)?;
        saved.push(path);
    }
    Ok(saved)
}

//! Zip archive extraction

use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Extract every file in `archive` into `dest`
///
/// Entries whose path would land outside `dest` (absolute paths, `..`
/// components) abort the extraction. Returns the extracted file paths in
/// archive order.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive).map_err(|e| {
        Error::archive(format!("Failed to open {}: {e}", archive.display()))
    })?;
    let mut zip = ZipArchive::new(file)?;
    std::fs::create_dir_all(dest)?;

    let mut files = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            Error::archive(format!(
                "Entry '{}' would extract outside {}",
                entry.name(),
                dest.display()
            ))
        })?;
        let target = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&target)?;
        let bytes = std::io::copy(&mut entry, &mut out)?;
        debug!(file = %target.display(), bytes, "Extracted");
        files.push(target);
    }

    Ok(files)
}

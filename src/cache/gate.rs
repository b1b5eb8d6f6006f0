// SPDX-License-Identifier: GPL-3.0-only
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cache directory could not be created
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to create cache directory {path}: {reason}")]
pub struct DirectoryError {
    pub path: PathBuf,
    pub reason: String,
}

/// Filesystem-backed cache lookup
///
/// A cache entry is nothing more than a file at the destination path. No
/// size or checksum validation happens here; completeness is guaranteed by
/// the downloader only ever renaming finished files into place.
pub struct CacheGate;

impl CacheGate {
    /// True iff a regular file exists at `path`
    pub async fn exists(path: &Path) -> bool {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.is_file(),
            Err(_) => false,
        }
    }

    /// Create every missing parent directory of `path`
    pub async fn ensure_directory(path: &Path) -> Result<(), DirectoryError> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DirectoryError {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!(dir = %parent.display(), "Cache directory ready");
        Ok(())
    }
}

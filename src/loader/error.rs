// SPDX-License-Identifier: GPL-3.0-only
use std::path::PathBuf;

use crate::cache::DirectoryError;
use crate::downloader::DownloadError;

/// Failure of one load request
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Failed to load model {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

impl LoadError {
    /// Stable label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Directory(_) => "directory",
            LoadError::Download(DownloadError::Network(_)) => "network",
            LoadError::Download(DownloadError::HttpStatus { .. }) => "http_status",
            LoadError::Download(DownloadError::Storage(_)) => "storage",
            LoadError::Parse { .. } => "parse",
        }
    }
}

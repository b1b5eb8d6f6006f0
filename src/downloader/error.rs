// SPDX-License-Identifier: GPL-3.0-only
use std::error::Error as _;

/// Why a fetch did not produce a cache file
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to store download: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest hides the interesting part (DNS, refused, reset) in the source chain
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        DownloadError::Network(message)
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DownloadError::HttpStatus {
            status: 404,
            url: "https://example.com/a.glb".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status 404 for https://example.com/a.glb");
        assert_eq!(DownloadError::Network("reset".into()).to_string(), "Network error: reset");
    }

    #[test]
    fn test_io_error_is_storage() {
        let err: DownloadError = std::io::Error::other("disk full").into();
        assert_eq!(err, DownloadError::Storage("disk full".to_string()));
    }
}

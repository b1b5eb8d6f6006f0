// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::Path;

use crate::downloader::error::DownloadError;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Stream `url` into `dest`, calling `on_progress` with the fraction
    /// received so far.
    ///
    /// On success `dest` holds the complete payload. On failure `dest` is
    /// left as it was before the call.
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<(), DownloadError>;
}

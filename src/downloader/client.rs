// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::downloader::error::DownloadError;
use crate::downloader::state::DownloadState;
use crate::downloader::traits::Fetcher;

pub struct HttpClient {
    client: Client,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("model-fetcher/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.request_timeout())?
            .with_retries(config.max_retries, config.retry_base_delay()))
    }

    /// Connection attempts (at least one) and the base of the exponential backoff
    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_base_delay = base_delay;
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Send the request, retrying only failures that happen before any
    /// response arrived
    async fn send_with_retry(&self, url: &str) -> Result<Response, DownloadError> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    if attempt > 1 {
                        info!(url = %url, attempt, "Connection succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) if e.is_builder() => return Err(e.into()),
                Err(e) => {
                    let error = DownloadError::from(e);
                    warn!(url = %url, attempt, error = %error, "Download attempt failed");
                    last_error = Some(error);
                    if attempt < self.max_retries {
                        tokio::time::sleep(self.backoff(attempt)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DownloadError::Network(format!("Download failed after {} attempts", self.max_retries))
        }))
    }
}

/// Temporary file next to `dest` so the final rename stays on one filesystem
fn staging_file(dest: &Path) -> Result<NamedTempFile, DownloadError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    tempfile::Builder::new()
        .prefix(".download-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| DownloadError::Storage(format!("cannot create staging file in {}: {}", dir.display(), e)))
}

async fn write_body(
    response: Response,
    file: &mut tokio::fs::File,
    state: &mut DownloadState,
    on_progress: &(dyn Fn(f32) + Send + Sync),
) -> Result<(), DownloadError> {
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        if let Some(fraction) = state.advance(chunk.len()) {
            on_progress(fraction);
        }
    }

    if let Some(missing) = state.missing() {
        return Err(DownloadError::Network(format!(
            "connection closed with {} of {} bytes missing",
            missing,
            state.total().unwrap_or_default()
        )));
    }

    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(
        &self,
        url: &str,
        dest: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<(), DownloadError> {
        info!(url = %url, path = %dest.display(), "Starting download");

        let response = self.send_with_retry(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mut state = DownloadState::new(response.content_length());

        // Dropping `temp_path` on any early return removes the partial file
        let (file, temp_path) = staging_file(dest)?.into_parts();
        let mut file = tokio::fs::File::from_std(file);
        debug!(staging = %temp_path.display(), total = ?state.total(), "Streaming response body");

        if let Err(e) = write_body(response, &mut file, &mut state, on_progress).await {
            state.fail();
            warn!(
                url = %url,
                received = state.received(),
                fraction = state.fraction(),
                status = ?state.status(),
                error = %e,
                "Download interrupted"
            );
            return Err(e);
        }
        drop(file);

        temp_path.persist(dest).map_err(|e| {
            DownloadError::Storage(format!("cannot move download into {}: {}", dest.display(), e.error))
        })?;

        if let Some(fraction) = state.succeed() {
            on_progress(fraction);
        }

        info!(url = %url, path = %dest.display(), bytes = state.received(), "Download completed");
        Ok(())
    }
}

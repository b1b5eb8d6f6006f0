// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    InProgress,
    Succeeded,
    Failed,
}

/// Progress bookkeeping for a single fetch
///
/// The reported fraction never decreases and only reaches `1.0` once all
/// announced bytes arrived or the fetch succeeded.
#[derive(Debug, Clone)]
pub struct DownloadState {
    total: Option<u64>,
    received: u64,
    fraction: f32,
    status: DownloadStatus,
}

impl DownloadState {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total,
            received: 0,
            fraction: 0.0,
            status: DownloadStatus::InProgress,
        }
    }

    /// Record `len` received bytes. Returns the fraction to report, if the
    /// total size is known.
    pub fn advance(&mut self, len: usize) -> Option<f32> {
        self.received += len as u64;
        let total = self.total.filter(|total| *total > 0)?;
        let fraction = (self.received as f64 / total as f64).min(1.0) as f32;
        self.fraction = self.fraction.max(fraction);
        Some(self.fraction)
    }

    /// Mark success. Returns `Some(1.0)` if that value was not reported yet.
    pub fn succeed(&mut self) -> Option<f32> {
        self.status = DownloadStatus::Succeeded;
        if self.fraction < 1.0 {
            self.fraction = 1.0;
            Some(1.0)
        } else {
            None
        }
    }

    pub fn fail(&mut self) {
        self.status = DownloadStatus::Failed;
    }

    /// Bytes still missing from an announced length
    pub fn missing(&self) -> Option<u64> {
        self.total
            .filter(|total| *total > self.received)
            .map(|total| total - self.received)
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn status(&self) -> DownloadStatus {
        self.status
    }
}

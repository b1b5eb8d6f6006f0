// SPDX-License-Identifier: GPL-3.0-only
pub mod client;
pub mod error;
pub mod state;
pub mod traits;

pub use client::HttpClient;
pub use error::DownloadError;
pub use traits::Fetcher;

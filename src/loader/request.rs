// SPDX-License-Identifier: GPL-3.0-only
use std::path::PathBuf;

use crate::scene::NodeId;

/// One fetch-and-load job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub source_url: String,
    pub destination_path: PathBuf,
}

impl AssetRequest {
    pub fn new(source_url: impl Into<String>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_path: destination_path.into(),
        }
    }
}

/// Where the parsed file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Network,
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub node_id: NodeId,
    pub path: PathBuf,
    pub source: LoadSource,
}

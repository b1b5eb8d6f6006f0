// SPDX-License-Identifier: GPL-3.0-only
mod cache;
mod config;
mod downloader;
mod loader;
mod logging;
mod parser;
mod progress;
mod scene;
mod utils;

#[cfg(test)]
mod test_helpers;

use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use config::Config;
use downloader::HttpClient;
use loader::ModelLoader;
use logging::setup_logging;
use parser::GlbParser;
use progress::TracingProgressSink;
use scene::{Container, SceneContainer};
use utils::{url_file_name, validate_url};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    setup_logging(&config.log_level)?;

    info!("Starting model-fetcher v{}", env!("CARGO_PKG_VERSION"));

    // A URL on the command line wins over the configured one
    let url = std::env::args().nth(1).unwrap_or_else(|| config.model_url.clone());
    let source = validate_url(&url).context("Invalid model URL")?;

    let cache_path = config.cache_path()?;
    info!(path = %cache_path.display(), "Model cache path");

    // The cache is keyed by asset name only, so another URL can be served a stale copy
    if let Some(name) = url_file_name(&source) {
        if name != config.asset_name {
            warn!(url = %url, asset_name = %config.asset_name, "URL file name differs from cached asset name");
        }
    }

    let fetcher = Arc::new(HttpClient::from_config(&config).context("Failed to build HTTP client")?);
    let container = Arc::new(SceneContainer::new());
    let loader = ModelLoader::new(
        fetcher,
        Arc::new(GlbParser::new()),
        container.clone(),
        cache_path,
    )
    .with_progress(Arc::new(TracingProgressSink::new()))
    .with_policy(config.replace_policy);

    let outcome = loader.download_and_load(&url).await?;

    if let Some(attached) = container.get(outcome.node_id) {
        info!(
            name = %attached.node.name,
            nodes = attached.node.node_count(),
            source = ?outcome.source,
            path = %outcome.path.display(),
            children = container.children().len(),
            "Model ready"
        );
    }

    Ok(())
}

// SPDX-License-Identifier: GPL-3.0-only
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::cache::CacheGate;
use crate::downloader::Fetcher;
use crate::loader::error::LoadError;
use crate::loader::request::{AssetRequest, LoadOutcome, LoadSource};
use crate::loader::state::{LoadPhase, ReplacePolicy};
use crate::parser::ModelParser;
use crate::progress::ProgressSink;
use crate::scene::node::{IDENTITY, ZERO};
use crate::scene::{Container, NodeId};

type SharedDownload = Shared<BoxFuture<'static, Result<(), LoadError>>>;
type InFlight = Arc<Mutex<HashMap<PathBuf, SharedDownload>>>;

/// Tracks and logs the phase of one request
struct PhaseTracker<'a> {
    url: &'a str,
    phase: LoadPhase,
}

impl<'a> PhaseTracker<'a> {
    fn new(url: &'a str) -> Self {
        Self { url, phase: LoadPhase::Idle }
    }

    fn advance(&mut self, next: LoadPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid load transition {} -> {}",
            self.phase,
            next
        );
        debug!(url = %self.url, from = %self.phase, to = %next, "Load phase transition");
        self.phase = next;
    }
}

/// Fetches a model into the local cache and attaches the parsed result
/// to a container.
///
/// Concurrent requests for the same cache path share one download. Clearing
/// and attaching container children is serialized across requests.
pub struct ModelLoader {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn ModelParser>,
    container: Arc<dyn Container>,
    progress: Option<Arc<dyn ProgressSink>>,
    destination: PathBuf,
    policy: ReplacePolicy,
    in_flight: InFlight,
    attach_lock: Mutex<()>,
}

impl ModelLoader {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn ModelParser>,
        container: Arc<dyn Container>,
        destination: PathBuf,
    ) -> Self {
        Self {
            fetcher,
            parser,
            container,
            progress: None,
            destination,
            policy: ReplacePolicy::default(),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            attach_lock: Mutex::new(()),
        }
    }

    /// Report download progress to `sink`, which starts out hidden
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        sink.set_visible(false);
        self.progress = Some(sink);
        self
    }

    pub fn with_policy(mut self, policy: ReplacePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load `url` through the configured cache path
    pub async fn download_and_load(&self, url: &str) -> Result<LoadOutcome, LoadError> {
        let request = AssetRequest::new(url, self.destination.clone());
        self.load(&request).await
    }

    /// Run one request to `Attached` or `Failed`
    pub async fn load(&self, request: &AssetRequest) -> Result<LoadOutcome, LoadError> {
        let mut phase = PhaseTracker::new(&request.source_url);
        let result = self.run(request, &mut phase).await;

        if let Err(e) = &result {
            phase.advance(LoadPhase::Failed);
            error!(
                url = %request.source_url,
                path = %request.destination_path.display(),
                kind = e.kind(),
                error = %e,
                "Model load failed"
            );
        }
        debug_assert!(phase.phase.is_terminal());

        result
    }

    async fn run(
        &self,
        request: &AssetRequest,
        phase: &mut PhaseTracker<'_>,
    ) -> Result<LoadOutcome, LoadError> {
        let path = &request.destination_path;

        phase.advance(LoadPhase::CacheCheck);
        let source = if CacheGate::exists(path).await {
            phase.advance(LoadPhase::CacheHit);
            info!(path = %path.display(), "Found file locally, loading from cache");
            LoadSource::Cache
        } else {
            phase.advance(LoadPhase::Downloading);
            self.download(request).await?
        };

        phase.advance(LoadPhase::Parsing);
        let node_id = self.parse_and_attach(path).await?;
        phase.advance(LoadPhase::Attached);

        info!(url = %request.source_url, node_id = %node_id, source = ?source, "Model loaded successfully");
        Ok(LoadOutcome {
            node_id,
            path: path.clone(),
            source,
        })
    }

    /// Start a download for the request's path or join the one in flight
    async fn download(&self, request: &AssetRequest) -> Result<LoadSource, LoadError> {
        let path = &request.destination_path;

        let task = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(path).cloned() {
                Some(existing) => {
                    info!(path = %path.display(), "Joining in-flight download");
                    existing
                }
                None => {
                    // A download may have finished between the cache check and taking the lock
                    if CacheGate::exists(path).await {
                        return Ok(LoadSource::Cache);
                    }

                    let task = run_download(
                        Arc::clone(&self.fetcher),
                        self.progress.clone(),
                        request.clone(),
                        Arc::clone(&self.in_flight),
                    )
                    .boxed()
                    .shared();
                    in_flight.insert(path.clone(), task.clone());
                    task
                }
            }
        };

        task.await?;
        Ok(LoadSource::Network)
    }

    async fn parse_and_attach(&self, path: &Path) -> Result<NodeId, LoadError> {
        let _guard = self.attach_lock.lock().await;

        if self.policy == ReplacePolicy::ClearBeforeParse {
            self.clear_container();
        }

        let root = match self.parser.parse(path) {
            Ok(Some(root)) => root,
            Ok(None) => {
                return Err(LoadError::Parse {
                    path: path.to_path_buf(),
                    reason: "parser returned no result".to_string(),
                });
            }
            Err(e) => {
                return Err(LoadError::Parse {
                    path: path.to_path_buf(),
                    reason: format!("{e:#}"),
                });
            }
        };

        if self.policy == ReplacePolicy::ReplaceOnSuccess {
            self.clear_container();
        }

        Ok(self.container.attach(root, ZERO, IDENTITY))
    }

    fn clear_container(&self) {
        let children = self.container.children();
        let count = children.len();
        for id in children {
            self.container.destroy(id);
        }
        debug!(count, "Cleared model container");
    }
}

/// Body of a shared download. Removes its own in-flight entry when done.
async fn run_download(
    fetcher: Arc<dyn Fetcher>,
    progress: Option<Arc<dyn ProgressSink>>,
    request: AssetRequest,
    in_flight: InFlight,
) -> Result<(), LoadError> {
    if let Some(sink) = &progress {
        sink.set_visible(true);
        sink.set_value(0.0);
    }

    let report = |fraction: f32| {
        if let Some(sink) = &progress {
            sink.set_value(fraction);
        }
    };
    let result = fetch_into_cache(fetcher.as_ref(), &request, &report).await;

    if let Some(sink) = &progress {
        sink.set_visible(false);
    }
    in_flight.lock().await.remove(&request.destination_path);

    result
}

async fn fetch_into_cache(
    fetcher: &dyn Fetcher,
    request: &AssetRequest,
    report: &(dyn Fn(f32) + Send + Sync),
) -> Result<(), LoadError> {
    CacheGate::ensure_directory(&request.destination_path).await?;
    fetcher
        .fetch(&request.source_url, &request.destination_path, report)
        .await?;
    Ok(())
}

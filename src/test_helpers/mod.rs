// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::downloader::state::DownloadState;
use crate::downloader::{DownloadError, Fetcher};
use crate::parser::{GlbParser, ModelParser};
use crate::progress::ProgressSink;
use crate::scene::Node;

/// Smallest document with one named node in its default scene
pub const MINIMAL_GLTF: &str = r#"{"asset":{"version":"2.0"},"scene":0,"scenes":[{"nodes":[0]}],"nodes":[{"name":"Root"}]}"#;

const GLB_PREFIX_LEN: usize = 20;

/// Wrap a glTF JSON document in a GLB container
pub fn build_glb(json: &str) -> Vec<u8> {
    let padded = json.len().div_ceil(4) * 4;
    glb_of_size(json, GLB_PREFIX_LEN + padded)
}

/// GLB of exactly `size` bytes, padding the JSON chunk with spaces
pub fn glb_of_size(json: &str, size: usize) -> Vec<u8> {
    let chunk_len = size - GLB_PREFIX_LEN;
    assert!(chunk_len >= json.len() && chunk_len % 4 == 0, "GLB size {size} cannot hold the JSON chunk");

    let mut chunk = json.as_bytes().to_vec();
    chunk.resize(chunk_len, b' ');

    let mut bytes = Vec::with_capacity(size);
    bytes.extend_from_slice(b"glTF");
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&(size as u32).to_le_bytes());
    bytes.extend_from_slice(&(chunk_len as u32).to_le_bytes());
    bytes.extend_from_slice(b"JSON");
    bytes.extend_from_slice(&chunk);
    bytes
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Visible(bool),
    Value(f32),
}

/// Progress sink that remembers every call
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn values(&self) -> Vec<f32> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Value(value) => Some(value),
                SinkEvent::Visible(_) => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn set_value(&self, fraction: f32) {
        self.events.lock().unwrap().push(SinkEvent::Value(fraction));
    }

    fn set_visible(&self, visible: bool) {
        self.events.lock().unwrap().push(SinkEvent::Visible(visible));
    }
}

/// Fetcher that "downloads" a fixed payload in fixed-size chunks
pub struct ScriptedFetcher {
    payload: Vec<u8>,
    chunk_size: usize,
    failure: Option<DownloadError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(payload: Vec<u8>, chunk_size: usize) -> Self {
        Self {
            payload,
            chunk_size: chunk_size.max(1),
            failure: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: DownloadError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(Vec::new(), 1)
        }
    }

    /// Sleep before starting, to keep the fetch in flight for a while
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        _url: &str,
        dest: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<(), DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let mut state = DownloadState::new(Some(self.payload.len() as u64));
        let mut staged = Vec::with_capacity(self.payload.len());
        for chunk in self.payload.chunks(self.chunk_size) {
            staged.extend_from_slice(chunk);
            tokio::task::yield_now().await;
            if let Some(fraction) = state.advance(chunk.len()) {
                on_progress(fraction);
            }
        }

        tokio::fs::write(dest, &staged).await?;
        if let Some(fraction) = state.succeed() {
            on_progress(fraction);
        }
        Ok(())
    }
}

/// Real GLB parser that counts invocations
pub struct CountingParser {
    inner: GlbParser,
    calls: AtomicUsize,
}

impl CountingParser {
    pub fn glb() -> Self {
        Self {
            inner: GlbParser::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelParser for CountingParser {
    fn parse(&self, path: &Path) -> anyhow::Result<Option<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse(path)
    }
}

enum StubOutcome {
    Node(Node),
    Null,
    Error(String),
}

/// Parser with a canned answer
pub struct StubParser {
    outcome: StubOutcome,
    calls: AtomicUsize,
}

impl StubParser {
    fn with(outcome: StubOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(node: Node) -> Self {
        Self::with(StubOutcome::Node(node))
    }

    pub fn null() -> Self {
        Self::with(StubOutcome::Null)
    }

    pub fn failing(message: &str) -> Self {
        Self::with(StubOutcome::Error(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelParser for StubParser {
    fn parse(&self, _path: &Path) -> anyhow::Result<Option<Node>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            StubOutcome::Node(node) => Ok(Some(node.clone())),
            StubOutcome::Null => Ok(None),
            StubOutcome::Error(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

#[test]
fn test_glb_of_size_is_exact() {
    let bytes = glb_of_size(MINIMAL_GLTF, 1000);
    assert_eq!(bytes.len(), 1000);
    assert_eq!(u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]), 1000);
}

// SPDX-License-Identifier: GPL-3.0-only
//! Scene-graph reader for binary glTF (`.glb`) and JSON glTF (`.gltf`).
//!
//! Only the node hierarchy of the default scene is materialized; meshes,
//! materials and buffers are left to the renderer that consumes the file.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::parser::traits::ModelParser;
use crate::scene::{Node, Transform};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
/// "JSON" in little endian
const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<SceneDef>,
    #[serde(default)]
    nodes: Vec<NodeDef>,
}

#[derive(Debug, Deserialize)]
struct SceneDef {
    #[serde(default)]
    nodes: Vec<usize>,
}

#[derive(Debug, Deserialize)]
struct NodeDef {
    name: Option<String>,
    #[serde(default)]
    children: Vec<usize>,
    translation: Option<[f32; 3]>,
    rotation: Option<[f32; 4]>,
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

fn looks_like_json(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

/// Locate the JSON chunk of a GLB container
fn json_chunk(bytes: &[u8]) -> anyhow::Result<&[u8]> {
    if bytes.len() < HEADER_LEN {
        bail!("file too short for a GLB header: {} bytes", bytes.len());
    }
    if &bytes[0..4] != GLB_MAGIC {
        bail!("not a glTF file: bad magic {:02x?}", &bytes[0..4]);
    }

    let version = read_u32(bytes, 4);
    if version != GLB_VERSION {
        bail!("unsupported GLB version {version}");
    }

    let declared = read_u32(bytes, 8) as usize;
    if declared != bytes.len() {
        bail!("GLB header declares {declared} bytes but file has {}", bytes.len());
    }

    if bytes.len() < HEADER_LEN + CHUNK_HEADER_LEN {
        bail!("GLB file has no chunks");
    }
    let chunk_len = read_u32(bytes, HEADER_LEN) as usize;
    let chunk_type = read_u32(bytes, HEADER_LEN + 4);
    if chunk_type != CHUNK_TYPE_JSON {
        bail!("first GLB chunk is {chunk_type:#010x}, expected JSON");
    }

    let start = HEADER_LEN + CHUNK_HEADER_LEN;
    let end = start
        .checked_add(chunk_len)
        .filter(|end| *end <= bytes.len())
        .with_context(|| format!("JSON chunk of {chunk_len} bytes runs past end of file"))?;

    Ok(&bytes[start..end])
}

/// Marks kept while materializing the node forest
struct Walk {
    /// Nodes on the current root-to-node path
    visiting: Vec<bool>,
    /// Nodes already placed somewhere in the tree; never reset
    placed: Vec<bool>,
}

impl Walk {
    fn new(len: usize) -> Self {
        Self {
            visiting: vec![false; len],
            placed: vec![false; len],
        }
    }
}

/// Recursively materialize node `index`. Every node may appear once, so the
/// output never grows beyond the document's node count.
fn build_node(doc: &Document, index: usize, walk: &mut Walk) -> anyhow::Result<Node> {
    let Some(def) = doc.nodes.get(index) else {
        bail!("node index {index} out of range ({} nodes)", doc.nodes.len());
    };
    if walk.visiting[index] {
        bail!("node {index} is its own ancestor");
    }
    if walk.placed[index] {
        bail!("node {index} has more than one parent");
    }

    walk.visiting[index] = true;
    walk.placed[index] = true;
    let children = def
        .children
        .iter()
        .map(|child| build_node(doc, *child, walk))
        .collect::<anyhow::Result<Vec<_>>>()?;
    walk.visiting[index] = false;

    Ok(Node {
        name: def.name.clone().unwrap_or_else(|| format!("node{index}")),
        transform: Transform {
            translation: def.translation.unwrap_or(Transform::IDENTITY.translation),
            rotation: def.rotation.unwrap_or(Transform::IDENTITY.rotation),
        },
        children,
    })
}

/// Root node indices of the default scene
fn scene_roots(doc: &Document) -> anyhow::Result<Vec<usize>> {
    if !doc.scenes.is_empty() {
        let index = doc.scene.unwrap_or(0);
        let Some(scene) = doc.scenes.get(index) else {
            bail!("default scene {index} out of range ({} scenes)", doc.scenes.len());
        };
        return Ok(scene.nodes.clone());
    }

    // No scenes: every node nobody claims as a child is a root
    let mut claimed = vec![false; doc.nodes.len()];
    for node in &doc.nodes {
        for child in &node.children {
            if let Some(slot) = claimed.get_mut(*child) {
                *slot = true;
            }
        }
    }
    Ok((0..doc.nodes.len()).filter(|i| !claimed[*i]).collect())
}

fn build_root(doc: &Document, name: &str) -> anyhow::Result<Option<Node>> {
    if doc.nodes.is_empty() {
        return Ok(None);
    }

    let mut walk = Walk::new(doc.nodes.len());
    let children = scene_roots(doc)?
        .into_iter()
        .map(|index| build_node(doc, index, &mut walk))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Some(Node::new(name).with_children(children)))
}

#[derive(Debug, Default)]
pub struct GlbParser;

impl GlbParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse in-memory GLB or glTF bytes into a root named `name`
    pub fn parse_bytes(&self, bytes: &[u8], name: &str) -> anyhow::Result<Option<Node>> {
        let json = if looks_like_json(bytes) {
            bytes
        } else {
            json_chunk(bytes)?
        };

        let doc: Document = serde_json::from_slice(json).context("invalid glTF JSON")?;
        build_root(&doc, name)
    }
}

impl ModelParser for GlbParser {
    fn parse(&self, path: &Path) -> anyhow::Result<Option<Node>> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("model");

        let root = self.parse_bytes(&bytes, name)?;
        if let Some(root) = &root {
            debug!(path = %path.display(), nodes = root.node_count(), "Parsed glTF scene graph");
        }
        Ok(root)
    }
}

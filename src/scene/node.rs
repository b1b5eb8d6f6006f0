// SPDX-License-Identifier: GPL-3.0-only
use uuid::Uuid;

/// Handle of a node attached to a container
pub type NodeId = Uuid;

/// Local translation in parent space
pub type Vec3 = [f32; 3];

/// Local rotation as a unit quaternion, `[x, y, z, w]`
pub type Quat = [f32; 4];

pub const ZERO: Vec3 = [0.0, 0.0, 0.0];
pub const IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: ZERO,
        rotation: IDENTITY,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node of a loaded model graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

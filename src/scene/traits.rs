// SPDX-License-Identifier: GPL-3.0-only
use crate::scene::node::{Node, NodeId, Quat, Vec3};

/// Scene node that owns loaded models
pub trait Container: Send + Sync {
    /// Ids of the nodes currently attached
    fn children(&self) -> Vec<NodeId>;

    /// Destroy an attached node and its subtree; unknown ids are ignored
    fn destroy(&self, id: NodeId);

    /// Take ownership of `node` and parent it at the given local pose
    fn attach(&self, node: Node, local_position: Vec3, local_rotation: Quat) -> NodeId;
}

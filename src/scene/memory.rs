// SPDX-License-Identifier: GPL-3.0-only
use std::sync::{PoisonError, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::scene::node::{Node, NodeId, Quat, Transform, Vec3};
use crate::scene::traits::Container;

/// A node parented under the container
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedNode {
    pub id: NodeId,
    pub node: Node,
}

/// In-process container node
#[derive(Debug, Default)]
pub struct SceneContainer {
    children: RwLock<Vec<AttachedNode>>,
}

impl SceneContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<AttachedNode> {
        self.children
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|child| child.id == id)
            .cloned()
    }
}

impl Container for SceneContainer {
    fn children(&self) -> Vec<NodeId> {
        self.children
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|child| child.id)
            .collect()
    }

    fn destroy(&self, id: NodeId) {
        let mut children = self.children.write().unwrap_or_else(PoisonError::into_inner);
        children.retain(|child| child.id != id);
        debug!(node_id = %id, "Destroyed container child");
    }

    fn attach(&self, mut node: Node, local_position: Vec3, local_rotation: Quat) -> NodeId {
        node.transform = Transform {
            translation: local_position,
            rotation: local_rotation,
        };
        let id = Uuid::new_v4();
        debug!(node_id = %id, name = %node.name, "Attached node to container");
        self.children
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AttachedNode { id, node });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::node::{IDENTITY, ZERO};

    #[test]
    fn test_attach_and_children() {
        let container = SceneContainer::new();
        assert!(container.children().is_empty());

        let a = container.attach(Node::new("a"), ZERO, IDENTITY);
        let b = container.attach(Node::new("b"), [1.0, 2.0, 3.0], IDENTITY);

        assert_eq!(container.children(), vec![a, b]);
        assert_eq!(container.get(b).unwrap().node.transform.translation, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_attach_overrides_node_transform() {
        let container = SceneContainer::new();
        let mut node = Node::new("offset");
        node.transform.translation = [5.0, 5.0, 5.0];
        node.transform.rotation = [0.0, 1.0, 0.0, 0.0];

        let id = container.attach(node, ZERO, IDENTITY);
        assert_eq!(container.get(id).unwrap().node.transform, Transform::IDENTITY);
    }

    #[test]
    fn test_destroy() {
        let container = SceneContainer::new();
        let a = container.attach(Node::new("a"), ZERO, IDENTITY);
        let b = container.attach(Node::new("b"), ZERO, IDENTITY);

        container.destroy(a);
        assert_eq!(container.children(), vec![b]);
        assert!(container.get(a).is_none());
    }

    #[test]
    fn test_destroy_unknown_is_noop() {
        let container = SceneContainer::new();
        let a = container.attach(Node::new("a"), ZERO, IDENTITY);

        container.destroy(Uuid::new_v4());
        assert_eq!(container.children(), vec![a]);
    }
}

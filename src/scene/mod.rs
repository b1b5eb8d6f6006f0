// SPDX-License-Identifier: GPL-3.0-only
pub mod memory;
pub mod node;
pub mod traits;

pub use memory::SceneContainer;
pub use node::{Node, NodeId, Transform};
pub use traits::Container;

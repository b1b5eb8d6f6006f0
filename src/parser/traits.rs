// SPDX-License-Identifier: GPL-3.0-only
use std::path::Path;

use crate::scene::Node;

pub trait ModelParser: Send + Sync {
    /// Materialize the model stored at `path`
    ///
    /// `Ok(None)` means the file was readable but yielded no root node.
    fn parse(&self, path: &Path) -> anyhow::Result<Option<Node>>;
}

// SPDX-License-Identifier: GPL-3.0-only
pub mod glb;
pub mod traits;

pub use glb::GlbParser;
pub use traits::ModelParser;

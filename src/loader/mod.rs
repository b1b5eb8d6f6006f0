// SPDX-License-Identifier: GPL-3.0-only
pub mod error;
pub mod request;
pub mod service;
pub mod state;

pub use service::ModelLoader;
pub use state::ReplacePolicy;

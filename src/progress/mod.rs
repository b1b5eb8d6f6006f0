// SPDX-License-Identifier: GPL-3.0-only
pub mod tracing_sink;
pub mod traits;

pub use tracing_sink::TracingProgressSink;
pub use traits::ProgressSink;

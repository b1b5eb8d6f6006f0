// SPDX-License-Identifier: GPL-3.0-only
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tracing::{debug, info};

use crate::progress::traits::ProgressSink;

/// Percent granularity of logged progress lines
const LOG_STEP_PERCENT: u32 = 10;

/// Progress sink that reports through `tracing`
///
/// Logs one line per crossed 10% step so a large download does not flood
/// the log with per-chunk updates.
#[derive(Debug, Default)]
pub struct TracingProgressSink {
    visible: AtomicBool,
    last_step: AtomicU32,
}

impl TracingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn step_of(fraction: f32) -> u32 {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32;
        percent / LOG_STEP_PERCENT * LOG_STEP_PERCENT
    }
}

impl ProgressSink for TracingProgressSink {
    fn set_value(&self, fraction: f32) {
        if !self.visible.load(Ordering::Relaxed) {
            return;
        }
        let step = Self::step_of(fraction);
        let previous = self.last_step.swap(step, Ordering::Relaxed);
        if step != previous {
            info!(percent = step, "Download progress");
        }
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
        if visible {
            self.last_step.store(0, Ordering::Relaxed);
        }
        debug!(visible, "Progress indicator visibility changed");
    }
}

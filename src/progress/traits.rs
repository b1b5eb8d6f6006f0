// SPDX-License-Identifier: GPL-3.0-only

/// Passive observer of download progress
pub trait ProgressSink: Send + Sync {
    /// Fraction complete, `0.0..=1.0`
    fn set_value(&self, fraction: f32);

    /// Show or hide the indicator
    fn set_visible(&self, visible: bool);
}

// SPDX-License-Identifier: GPL-3.0-only
use std::path::Path;

/// Reduce a configured asset name to one file name inside the cache directory.
///
/// Directory parts are dropped and only alphanumerics, `-`, `_`, `.` and
/// spaces survive. Returns `None` when nothing usable is left, or when the
/// result is hidden and could clash with in-progress `.download-*` files.
pub fn asset_file_name(name: &str) -> Option<String> {
    let last = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);

    let cleaned: String = last
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.starts_with('.') {
        return None;
    }
    Some(cleaned.to_string())
}

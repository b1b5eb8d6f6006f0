// SPDX-License-Identifier: GPL-3.0-only
use anyhow::{Context, ensure};
use url::Url;

const MAX_URL_LENGTH: usize = 2048;

/// Parse a model source URL, accepting only http(s) URLs with a host
pub fn validate_url(raw: &str) -> anyhow::Result<Url> {
    ensure!(
        raw.len() <= MAX_URL_LENGTH,
        "URL is {} characters long, limit is {}",
        raw.len(),
        MAX_URL_LENGTH
    );

    let url = Url::parse(raw).with_context(|| format!("Invalid URL: {raw}"))?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "Unsupported URL scheme {:?}, expected http or https",
        url.scheme()
    );
    ensure!(
        url.host_str().is_some_and(|host| !host.is_empty()),
        "URL has no host: {raw}"
    );

    Ok(url)
}

/// Last path segment of a URL, if it names a file
pub fn url_file_name(url: &Url) -> Option<&str> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
}

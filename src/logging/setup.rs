// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter: `RUST_LOG` wins, then the configured level, then `info`
pub fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

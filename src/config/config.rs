// SPDX-License-Identifier: GPL-3.0-only
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::loader::ReplacePolicy;
use crate::utils::asset_file_name;

/// Directory under the data root that holds cached assets
const FILES_DIR: &str = "Files";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application-writable root for cached data
    pub data_root: PathBuf,

    /// File name of the cached asset under `<data_root>/Files`
    pub asset_name: String,

    /// Remote GLB/glTF URL to fetch when none is given on the command line
    pub model_url: String,

    /// Whole-request timeout for downloads in seconds
    pub request_timeout_secs: u64,

    /// Connection attempts before a download is reported as failed
    pub max_retries: u32,

    /// Base delay between connection attempts, doubled on every retry
    pub retry_base_delay_ms: u64,

    /// When the container is cleared relative to parsing
    pub replace_policy: ReplacePolicy,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("MODEL_FETCHER_CONFIG")
            .unwrap_or_else(|_| "config.toml".to_string());

        let mut config = Self::load_file(Path::new(&config_path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Read a TOML file, falling back to defaults when it does not exist
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `MODEL_FETCHER_*` overrides using `lookup` to resolve variables
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("MODEL_FETCHER_DATA_ROOT") {
            self.data_root = PathBuf::from(val);
        }
        if let Some(val) = lookup("MODEL_FETCHER_ASSET_NAME") {
            self.asset_name = val;
        }
        if let Some(val) = lookup("MODEL_FETCHER_MODEL_URL") {
            self.model_url = val;
        }
        if let Some(val) = lookup("MODEL_FETCHER_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = val
                .parse()
                .context("MODEL_FETCHER_REQUEST_TIMEOUT_SECS must be an integer")?;
        }
        if let Some(val) = lookup("MODEL_FETCHER_MAX_RETRIES") {
            self.max_retries = val
                .parse()
                .context("MODEL_FETCHER_MAX_RETRIES must be an integer")?;
        }
        if let Some(val) = lookup("MODEL_FETCHER_RETRY_BASE_DELAY_MS") {
            self.retry_base_delay_ms = val
                .parse()
                .context("MODEL_FETCHER_RETRY_BASE_DELAY_MS must be an integer")?;
        }
        if let Some(val) = lookup("MODEL_FETCHER_REPLACE_POLICY") {
            self.replace_policy = val.parse()?;
        }
        if let Some(val) = lookup("MODEL_FETCHER_LOG_LEVEL") {
            self.log_level = val;
        }

        Ok(())
    }

    /// Directory holding cached asset files
    pub fn files_dir(&self) -> PathBuf {
        self.data_root.join(FILES_DIR)
    }

    /// Fixed cache location of the configured asset
    pub fn cache_path(&self) -> anyhow::Result<PathBuf> {
        let file_name = asset_file_name(&self.asset_name)
            .with_context(|| format!("Invalid asset name: {:?}", self.asset_name))?;
        Ok(self.files_dir().join(file_name))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            asset_name: String::from("test.glb"),
            model_url: String::from("https://dracoarts-logo.s3.eu-north-1.amazonaws.com/test.glb"),
            request_timeout_secs: 300, // 5 minutes
            max_retries: 3,
            retry_base_delay_ms: 1000,
            replace_policy: ReplacePolicy::ReplaceOnSuccess,
            log_level: String::from("info"),
        }
    }
}

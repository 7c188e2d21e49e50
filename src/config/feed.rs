// src/config/feed.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::extract::KeywordSet;
use crate::ingest::registry::default_sources;
use crate::ingest::types::SourceDescriptor;

pub const ENV_JOBS_CONFIG_PATH: &str = "JOBS_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/jobs.toml";
pub const DEFAULT_JSON_PATH: &str = "config/jobs.json";

const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Everything a run needs. `FeedConfig::default()` is the built-in setup; a
/// config file only overrides the fields it names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    pub sources: Vec<SourceDescriptor>,
    pub keywords: KeywordSet,
    /// Max postings kept per board.
    pub per_source_cap: usize,
    /// Max rows in the rendered table.
    pub display_cap: usize,
    pub request_timeout_secs: u64,
    /// Pause after each board.
    pub delay_ms: u64,
    pub document_path: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            keywords: KeywordSet::default(),
            per_source_cap: 8,
            display_cap: 12,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            delay_ms: 500,
            document_path: PathBuf::from("README.md"),
        }
    }
}

impl FeedConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading jobs config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing jobs config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolve config using env var + fallbacks:
    /// 1) $JOBS_CONFIG_PATH
    /// 2) config/jobs.toml
    /// 3) config/jobs.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_JOBS_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                tracing::debug!(path = %pb.display(), "jobs config from env");
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("JOBS_CONFIG_PATH points to non-existent path"));
            }
        }
        for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                tracing::debug!(path = %pb.display(), "jobs config from file");
                return Self::load_from(&pb);
            }
        }
        tracing::debug!("jobs config: built-in defaults");
        Ok(Self::default())
    }

    fn sanitized(mut self) -> Self {
        // reqwest treats a zero timeout as "fail immediately"
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if self.keywords.is_empty() {
            tracing::warn!("jobs config has no keywords; nothing will match");
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<FeedConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => serde_json::from_str(s)
            .map_err(anyhow::Error::from)
            .or_else(|_| toml::from_str(s).map_err(anyhow::Error::from))
            .map_err(|_| anyhow!("unsupported jobs config format")),
    }
}

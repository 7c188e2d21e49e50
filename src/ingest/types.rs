// src/ingest/types.rs
use serde::{Deserialize, Serialize};

/// What a board is expected to answer with. Informational only: every body goes
/// through the same JSON extraction, so an `Html` board usually yields nothing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShapeHint {
    #[default]
    Api,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub name: String, // e.g., "Postman", "RemoteOK"
    pub url: String,
    #[serde(default, rename = "type")]
    pub shape: ShapeHint,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>, shape: ShapeHint) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            shape,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posting {
    pub title: String,   // display casing
    pub company: String, // the source name
    pub location: String,
    pub apply_url: String,
    pub source_url: String,
}

impl Posting {
    /// Dedup identity: exact, case-sensitive (title, company).
    pub fn identity(&self) -> (&str, &str) {
        (&self.title, &self.company)
    }
}

/// Result of polling one board. A board that could not be reached or parsed is
/// still a scan, just one with `parse_failed` set and no postings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceScan {
    pub source: String,
    pub postings: Vec<Posting>,
    pub parse_failed: bool,
}

#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Best-effort GET. Implementations return `""` instead of failing.
    async fn fetch_page(&self, url: &str) -> String;
}

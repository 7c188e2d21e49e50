// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod ingest;
pub mod render;

pub use crate::config::FeedConfig;
pub use crate::ingest::fetch::HttpFetcher;
pub use crate::ingest::types::{PageFetcher, Posting, ShapeHint, SourceDescriptor, SourceScan};
pub use crate::render::{JobsBlock, RenderOutcome};

use chrono::Utc;

/// Scan every board, dedupe, and splice the table into `cfg.document_path`.
///
/// Board failures only shrink the result; the only error is a document that
/// cannot be read or written.
pub async fn run_update<F: PageFetcher + ?Sized>(
    cfg: &FeedConfig,
    fetcher: &F,
) -> anyhow::Result<RenderOutcome> {
    let all = ingest::run_once(cfg, fetcher).await;
    let unique = ingest::dedupe(&all);
    let block = JobsBlock::new(&unique, cfg.display_cap, &cfg.sources, Utc::now());
    render::update_document(&cfg.document_path, &block).await
}

/// Same scan as [`run_update`], but returns the rendered block instead of
/// writing it. `None` when nothing matched.
pub async fn preview_block<F: PageFetcher + ?Sized>(cfg: &FeedConfig, fetcher: &F) -> Option<String> {
    let unique = ingest::dedupe(&ingest::run_once(cfg, fetcher).await);
    let block = JobsBlock::new(&unique, cfg.display_cap, &cfg.sources, Utc::now());
    (!block.is_empty()).then(|| block.render())
}

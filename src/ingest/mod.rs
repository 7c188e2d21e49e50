// src/ingest/mod.rs
pub mod extract;
pub mod fetch;
pub mod registry;
pub mod types;

use crate::config::FeedConfig;
use crate::ingest::types::{PageFetcher, Posting, SourceDescriptor, SourceScan};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

/// One-time metrics registration (so series carry descriptions once a recorder exists).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "jobs_fetch_errors_total",
            "Board fetches that ended in a transport error."
        );
        describe_counter!(
            "jobs_parse_failures_total",
            "Board bodies that were not valid JSON."
        );
        describe_counter!(
            "jobs_matched_total",
            "Postings kept after keyword filtering and the per-board cap."
        );
        describe_counter!(
            "jobs_dedup_total",
            "Postings dropped as duplicate (title, company)."
        );
        describe_histogram!("jobs_fetch_ms", "Board fetch time in milliseconds.");
        describe_gauge!("jobs_last_run_ts", "Unix ts when the board scan last ran.");
    });
}

/// Fetch + extract a single board. Never fails; problems show up as an empty scan.
pub async fn scan_source<F: PageFetcher + ?Sized>(
    fetcher: &F,
    source: &SourceDescriptor,
    cfg: &FeedConfig,
) -> SourceScan {
    let body = fetcher.fetch_page(&source.url).await;
    extract::scan_body(&body, source, &cfg.keywords, cfg.per_source_cap)
}

/// Poll every configured board, one at a time, pausing `cfg.delay()` between
/// boards. Scans come back in registry order.
pub async fn scan_all<F: PageFetcher + ?Sized>(cfg: &FeedConfig, fetcher: &F) -> Vec<SourceScan> {
    ensure_metrics_described();
    tracing::info!(sources = cfg.sources.len(), "scanning job boards");

    let mut scans = Vec::with_capacity(cfg.sources.len());
    for (i, source) in cfg.sources.iter().enumerate() {
        let scan = scan_source(fetcher, source, cfg).await;
        tracing::info!(source = %source.name, matches = scan.postings.len(), "board scanned");
        counter!("jobs_matched_total").increment(scan.postings.len() as u64);
        scans.push(scan);

        if i + 1 < cfg.sources.len() {
            tokio::time::sleep(cfg.delay()).await;
        }
    }

    let now = chrono::Utc::now().timestamp().max(0);
    gauge!("jobs_last_run_ts").set(now as f64);
    scans
}

/// Concatenate scans in order.
pub fn collect_postings(scans: Vec<SourceScan>) -> Vec<Posting> {
    scans.into_iter().flat_map(|s| s.postings).collect()
}

/// Run the scan once and return every matching posting, not yet deduplicated.
pub async fn run_once<F: PageFetcher + ?Sized>(cfg: &FeedConfig, fetcher: &F) -> Vec<Posting> {
    let all = collect_postings(scan_all(cfg, fetcher).await);
    tracing::info!(total = all.len(), "board scan finished");
    for (i, p) in all.iter().take(5).enumerate() {
        tracing::info!(rank = i + 1, title = %p.title, company = %p.company, "match");
    }
    all
}

/// Keep the first posting for each (title, company); order is preserved.
pub fn dedupe(postings: &[Posting]) -> Vec<Posting> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut keep = Vec::with_capacity(postings.len());
    for p in postings {
        if seen.insert(p.identity()) {
            keep.push(p.clone());
        }
    }

    let dropped = postings.len() - keep.len();
    if dropped > 0 {
        counter!("jobs_dedup_total").increment(dropped as u64);
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, company: &str) -> Posting {
        Posting {
            title: title.into(),
            company: company.into(),
            location: "Remote".into(),
            apply_url: "https://example.test/apply".into(),
            source_url: "https://example.test".into(),
        }
    }

    #[test]
    fn dedupe_keeps_first_seen_order() {
        let input = vec![
            posting("Technical Writer", "Postman"),
            posting("Docs Engineer", "Twilio"),
            posting("Technical Writer", "Postman"),
            posting("Technical Writer", "Twilio"),
        ];
        let out = dedupe(&input);
        let keys: Vec<_> = out.iter().map(|p| p.identity()).collect();
        assert_eq!(
            keys,
            vec![
                ("Technical Writer", "Postman"),
                ("Docs Engineer", "Twilio"),
                ("Technical Writer", "Twilio"),
            ]
        );
    }

    #[test]
    fn dedupe_is_case_sensitive_and_idempotent() {
        let input = vec![
            posting("Technical Writer", "Postman"),
            posting("technical writer", "Postman"),
        ];
        let once = dedupe(&input);
        assert_eq!(once.len(), 2);
        assert_eq!(dedupe(&once), once);
    }

    #[test]
    fn dedupe_of_empty_is_empty() {
        assert!(dedupe(&[]).is_empty());
    }
}

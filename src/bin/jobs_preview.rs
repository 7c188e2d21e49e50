//! Runs the board scan and prints the rendered jobs block to stdout; no files are written.

use tech_writing_jobs::{preview_block, FeedConfig, HttpFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = FeedConfig::load_default()?;
    let fetcher = HttpFetcher::new().with_timeout(cfg.request_timeout_secs);

    match preview_block(&cfg, &fetcher).await {
        Some(block) => println!("{block}"),
        None => eprintln!("no writing jobs found"),
    }
    Ok(())
}

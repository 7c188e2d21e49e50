//! Job board sync — binary entrypoint.
//! Scans the configured boards once and rewrites the jobs section of the target document.

use tech_writing_jobs::{run_update, FeedConfig, HttpFetcher, RenderOutcome};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev (RUST_LOG, JOBS_CONFIG_PATH); no-op otherwise.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = FeedConfig::load_default()?;
    let fetcher = HttpFetcher::new().with_timeout(cfg.request_timeout_secs);

    match run_update(&cfg, &fetcher).await? {
        RenderOutcome::Updated { written, .. } => {
            tracing::info!(written, document = %cfg.document_path.display(), "run complete");
        }
        RenderOutcome::NoJobs => tracing::info!("run complete; nothing changed"),
    }
    Ok(())
}

//! magpie: keyword image harvester with a resumable download queue.
//!
//! `magpie collect` records search results as pending image rows;
//! `magpie download` fetches the bytes for everything still pending. Both
//! commands open the store at startup and close it on every exit path.

mod cli;

use crate::cli::{Cli, Command};
use clap::Parser;
use magpie_cache::{Database, Repository};
use magpie_config::Config;
use magpie_search::DuckDuckGo;
use miette::IntoDiagnostic;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).map_err(miette::Report::msg)?;
    let client = reqwest::Client::builder()
        // There is no cancellation mechanism beyond this timeout: a stuck
        // request blocks the whole sequential run.
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .user_agent(config.http.user_agent.as_str())
        .build()
        .into_diagnostic()?;
    let db = Database::connect(&config.database).await.map_err(miette::Report::msg)?;
    let repo = Repository::from(&db);
    let outcome = run(cli.command, &config, &client, &repo).await;
    db.close().await;
    outcome
}

async fn run(command: Command, config: &Config, client: &reqwest::Client, repo: &Repository) -> miette::Result<()> {
    match command {
        Command::Collect { keyword, tags } => {
            let provider = DuckDuckGo::new(client.clone(), config.search.region.as_str(), config.search.safesearch)
                .map_err(miette::Report::msg)?;
            let report = magpie_pipeline::collect_metadata(&provider, repo, &keyword, &tags)
                .await
                .map_err(miette::Report::msg)?;
            tracing::info!(discovered = report.discovered, "collection complete");
        },
        Command::Download { folder } => {
            let folder = folder.unwrap_or_else(|| config.downloads.clone());
            let report = magpie_pipeline::download_images(client, repo, &folder)
                .await
                .map_err(miette::Report::msg)?;
            tracing::info!(
                fetched = report.fetched,
                skipped = report.skipped,
                failed = report.failed,
                total = report.total,
                "download complete"
            );
        },
    }
    Ok(())
}

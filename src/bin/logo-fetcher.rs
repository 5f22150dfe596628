use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use logo_fetcher::{
    ArchiveBuilder, FetcherConfig, LogoPipeline, ReqwestHttpClient, ResultStore,
    ZipArchiveBuilder, archive_entries, parse_company_list,
};

#[derive(Parser, Debug)]
#[command(name = "logo-fetcher", about = "Find brand logos for a list of companies")]
struct Cli {
    /// Company names, comma-separated
    companies: String,

    /// Brandfetch API key
    #[arg(long, env = "BRANDFETCH_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Write every found logo into this zip archive
    #[arg(long)]
    output: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    /// Give up on companies still unresolved after this many milliseconds
    #[arg(long)]
    batch_timeout_ms: Option<u64>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logo_fetcher=info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let companies = parse_company_list(&cli.companies);
    if companies.is_empty() {
        anyhow::bail!("no company names given");
    }

    let config = FetcherConfig {
        request_timeout_ms: cli.timeout_ms,
        batch_timeout_ms: cli.batch_timeout_ms,
        ..Default::default()
    };
    let pipeline = LogoPipeline::new(Arc::new(ReqwestHttpClient::new()), config);

    let mut store = ResultStore::new();
    pipeline
        .resolve_into(&mut store, &companies, &cli.api_key)
        .await
        .context("logo resolution failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(store.entries())?);
    } else {
        for logo in store.entries() {
            match (logo.logo_url(), logo.error_message()) {
                (Some(url), _) => {
                    let marker = if logo.is_white() { " (white)" } else { "" };
                    println!("{}: {}{}", logo.company_name(), url, marker);
                }
                (None, Some(error)) => println!("{}: {}", logo.company_name(), error),
                (None, None) => {}
            }
        }
    }

    let white = store.white_logo_companies();
    if !white.is_empty() {
        tracing::warn!(
            companies = %white.join(", "),
            "These logos are predominantly white; view them against a dark background"
        );
    }

    if let Some(path) = cli.output {
        let entries = archive_entries(&store, &store.select_all());
        let archive = ZipArchiveBuilder::new().build(&entries)?;
        tokio::fs::write(&path, archive)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), logos = entries.len(), "Wrote logo archive");
    }

    Ok(())
}

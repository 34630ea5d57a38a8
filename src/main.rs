use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pubmed_retrieve::config::{DEFAULT_FETCH_URL, DEFAULT_IDENTIFIER_KEY, DEFAULT_SEARCH_URL};
use pubmed_retrieve::{ClientConfig, EntryPolicy, PubMedClient, RecordSerializer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pubmed-retrieve",
    about = "Search PubMed and retrieve article records as JSON",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// ESearch endpoint
    #[arg(long, env = "PUBMED_SEARCH_URL", default_value = DEFAULT_SEARCH_URL, global = true)]
    search_url: String,

    /// EFetch endpoint
    #[arg(long, env = "PUBMED_FETCH_URL", default_value = DEFAULT_FETCH_URL, global = true)]
    fetch_url: String,

    /// Email for NCBI requests (recommended)
    #[arg(long, env = "NCBI_EMAIL", global = true)]
    email: Option<String>,

    /// Tool name for NCBI requests
    #[arg(long, env = "NCBI_TOOL", default_value = "pubmed-retrieve", global = true)]
    tool: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Search PubMed and print matching PMIDs or full records
    Search(Search),
}

#[derive(Args, Debug)]
struct Search {
    /// Search query, passed to PubMed unchanged (e.g. "cancer[majr] AND Cell[ta]")
    #[arg(value_name = "QUERY")]
    query: String,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Show only PMIDs (one per line)
    #[arg(long)]
    ids_only: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Field name used for the identifier in JSON output
    #[arg(long, default_value = DEFAULT_IDENTIFIER_KEY)]
    id_key: String,

    /// Fail instead of skipping records with missing required fields
    #[arg(long)]
    strict: bool,

    /// Save results to file instead of printing them
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Search {
    async fn execute(&self, config: ClientConfig) -> Result<()> {
        let policy = if self.strict {
            EntryPolicy::Strict
        } else {
            EntryPolicy::SkipMalformed
        };
        let client = PubMedClient::with_config(
            config
                .with_max_results(self.limit)
                .with_entry_policy(policy)
                .with_identifier_key(&self.id_key),
        );
        let query = client.query(&self.query);

        let output = if self.ids_only {
            let ids = client.search_articles(&query).await?;
            let mut lines = ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            lines.push('\n');
            lines.into_bytes()
        } else {
            let records = client.search_and_fetch(&query).await?;
            let mut bytes = RecordSerializer::new()
                .with_identifier_key(&self.id_key)
                .pretty(self.pretty)
                .encode(&records)?;
            bytes.push(b'\n');
            bytes
        };

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &output)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!(path = %path.display(), "Results saved");
            }
            None => {
                use tokio::io::AsyncWriteExt;
                let mut stdout = tokio::io::stdout();
                stdout.write_all(&output).await?;
                stdout.flush().await?;
            }
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::new()
        .with_search_url(&cli.search_url)
        .with_fetch_url(&cli.fetch_url)
        .with_tool(&cli.tool)
        .with_timeout(Duration::from_secs(cli.timeout));
    if let Some(email) = &cli.email {
        config = config.with_email(email);
    }

    match &cli.command {
        Commands::Search(cmd) => cmd.execute(config).await,
    }
}

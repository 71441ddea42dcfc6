mod crawl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "reviewcrawl")]
#[command(about = "Crawl retail product reviews into JSON lines")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl reviews for every configured keyword.
    Crawl {
        /// Crawl only this keyword instead of the keywords file. Repeatable.
        #[arg(long = "keyword", value_name = "KEYWORD")]
        keywords: Vec<String>,
        /// Write JSON lines to this file instead of stdout.
        #[arg(long, env = "REVIEWCRAWL_OUTPUT")]
        output: Option<PathBuf>,
        /// Print the seed URLs and exit without crawling.
        #[arg(long)]
        dry_run: bool,
    },
    /// List the keywords from the keywords file.
    Keywords,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = reviewcrawl_core::load_app_config_from_env()?;

    // stdout may carry records, so logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Crawl {
            keywords,
            output,
            dry_run,
        } => crawl::run_crawl(&config, &keywords, output.as_deref(), dry_run).await,
        Commands::Keywords => crawl::list_keywords(&config),
    }
}

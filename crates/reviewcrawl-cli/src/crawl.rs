//! Crawl command handlers for the CLI.
//!
//! Per-keyword and per-product failures are logged by the crawler and
//! skipped; this layer fails only on configuration, output, or a run in
//! which no keyword got past its search page.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use reviewcrawl_core::{load_keywords, AppConfig, SearchQuery};
use reviewcrawl_scraper::{CrawlSummary, Crawler, Fetch, HttpFetcher, JsonLinesSink};

/// Keywords for this run: the `--keyword` overrides when given, otherwise
/// the validated keywords file.
///
/// # Errors
///
/// Returns an error if every override is blank or the keywords file cannot
/// be loaded.
pub(crate) fn resolve_queries(
    config: &AppConfig,
    overrides: &[String],
) -> anyhow::Result<Vec<SearchQuery>> {
    if overrides.is_empty() {
        let file = load_keywords(&config.keywords_path)?;
        return Ok(file.queries());
    }

    let queries: Vec<SearchQuery> = overrides
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(SearchQuery::new)
        .collect();
    if queries.is_empty() {
        anyhow::bail!("every --keyword value is blank");
    }
    Ok(queries)
}

/// Crawl reviews for the resolved keywords and write them as JSON lines to
/// `output` (stdout when `None`).
///
/// When `dry_run` is `true` the seed URLs are printed and nothing is fetched.
///
/// # Errors
///
/// Returns an error if the keywords cannot be resolved, the HTTP client or
/// output file cannot be created, the output cannot be written, or every
/// keyword failed.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    keyword_overrides: &[String],
    output: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let queries = resolve_queries(config, keyword_overrides)?;
    let fetcher = HttpFetcher::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
    let crawler = Crawler::from_config(fetcher, config);

    if dry_run {
        for request in crawler.seed_requests(&queries) {
            println!("{}", request.url);
        }
        println!("dry-run: would crawl {} keywords", queries.len());
        return Ok(());
    }

    tracing::info!(
        env = %config.env,
        keywords = queries.len(),
        max_concurrent = config.max_concurrent_requests,
        "starting crawl"
    );
    let summary = crawl_to(&crawler, &queries, open_output(output)?).await?;
    eprintln!("crawl complete: {summary}");
    Ok(())
}

/// Runs `crawler` over `queries`, writing one JSON line per record to `writer`.
///
/// # Errors
///
/// Returns an error if the writer fails or no keyword got past search.
pub(crate) async fn crawl_to<F: Fetch, W: Write>(
    crawler: &Crawler<F>,
    queries: &[SearchQuery],
    writer: W,
) -> anyhow::Result<CrawlSummary> {
    let mut sink = JsonLinesSink::new(writer);
    let summary = crawler
        .run(queries, &mut sink)
        .await
        .context("crawl aborted")?;

    if summary.total_failures() > 0 {
        tracing::warn!(
            failures = summary.total_failures(),
            keywords_failed = summary.keywords_failed,
            "some requests failed during the crawl"
        );
    }
    if summary.all_keywords_failed() {
        anyhow::bail!("all {} keywords failed", summary.keywords);
    }
    Ok(summary)
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

/// Print the configured keywords, one per line, with their notes.
///
/// # Errors
///
/// Returns an error if the keywords file cannot be loaded.
pub(crate) fn list_keywords(config: &AppConfig) -> anyhow::Result<()> {
    let file = load_keywords(&config.keywords_path)?;
    for entry in &file.keywords {
        match entry.notes.as_deref() {
            Some(notes) => println!("{}\t{notes}", entry.keyword.trim()),
            None => println!("{}", entry.keyword.trim()),
        }
    }
    Ok(())
}

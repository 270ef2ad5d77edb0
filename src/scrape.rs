use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::graphql::{self, Outcome};
use crate::links::ProblemRef;
use crate::output::{self, TopicRecord};
use crate::parser;

/// Courtesy delay between consecutive problems.
const PACING: Duration = Duration::from_secs(1);

/// Flush the result sequence to disk after this many completions.
const CHECKPOINT_EVERY: usize = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Run stats returned after completion.
pub struct RunStats {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
}

/// Build the shared HTTP client with fixed browser-identifying headers, used
/// by both the GraphQL query and the page fetch.
pub fn http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(REFERER, HeaderValue::from_static("https://leetcode.com/"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Resolve one problem: structured source first, rendered-page heuristics as
/// fallback. Always returns a record; per-URL failures end up in its
/// `topics` field and never reach the run loop.
pub async fn resolve_topics(client: &Client, problem: &ProblemRef) -> TopicRecord {
    if let Outcome::Found(topics) = graphql::fetch_topics(client, &problem.slug).await {
        info!("{}: {} topics via GraphQL", problem.slug, topics.len());
        return TopicRecord::found(problem, &topics);
    }

    debug!("{}: falling back to page scrape", problem.slug);
    match fetch_page(client, &problem.url).await {
        Ok(html) => {
            let topics = parser::extract_topics(&html);
            if topics.is_empty() {
                info!("{}: no topics found on page", problem.slug);
                TopicRecord::not_found(problem)
            } else {
                info!("{}: {} topics via page heuristics", problem.slug, topics.len());
                TopicRecord::found(problem, &topics)
            }
        }
        Err(e) => {
            warn!("{}: page fetch failed: {:#}", problem.slug, e);
            TopicRecord::error(problem, &format!("{:#}", e))
        }
    }
}

/// GET the problem page. The error text becomes the record's `topics` field
/// verbatim (after the `Error: ` prefix), so no context is layered on here.
async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        bail!("HTTP {}", status.as_u16());
    }
    Ok(response.text().await?)
}

/// Process the links strictly in input order, pausing `PACING` between
/// problems, checkpointing every `CHECKPOINT_EVERY` completions and once
/// more after the loop. Ctrl-C stops iteration at the next boundary;
/// whatever has accumulated is still flushed.
pub async fn run(client: &Client, links: Vec<ProblemRef>, out_path: &Path) -> Result<RunStats> {
    let total = links.len();
    let shutdown = shutdown_flag();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut stats = RunStats {
        total: 0,
        found: 0,
        not_found: 0,
        errors: 0,
    };
    let mut records: Vec<TopicRecord> = Vec::with_capacity(total);

    for (i, problem) in links.iter().enumerate() {
        if shutdown.load(Ordering::Relaxed) {
            info!("Interrupted after {} links, saving progress", records.len());
            break;
        }

        let record = resolve_topics(client, problem).await;
        if record.is_error() {
            stats.errors += 1;
        } else if record.topics == output::NOT_FOUND {
            stats.not_found += 1;
        } else {
            stats.found += 1;
        }
        records.push(record);
        pb.inc(1);

        if records.len() % CHECKPOINT_EVERY == 0 || records.len() == total {
            debug!("Checkpoint: saving {} of {} records", records.len(), total);
            output::save_records(out_path, &records)?;
        }

        if i + 1 < total {
            tokio::time::sleep(PACING).await;
        }
    }

    pb.finish_and_clear();

    // Covers interruption and the empty-input case; a repeat of the final
    // checkpoint otherwise, with identical bytes.
    output::save_records(out_path, &records)?;

    stats.total = records.len();
    Ok(stats)
}

/// Ctrl-C flips a flag the run loop polls between iterations. The in-flight
/// problem finishes and the final flush still runs.
fn shutdown_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let watcher = Arc::clone(&flag);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping after the current link");
            watcher.store(true, Ordering::Relaxed);
        }
    });
    flag
}

//! Offline data-refresh utility: pages through a company's public problem
//! list and writes one JSON file per page into a pool directory that the
//! roulette's company sheets read from.
//!
//! Not part of the normal selection run. Page failures are logged and
//! swallowed so one bad page never aborts its siblings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use rand::Rng;

const BASE_URL: &str =
    "https://www.naukri.com/code360/api/v3/public_section/company_problem_list";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_SECS: u64 = 5;

/// Fetch paginated company problem lists into per-page JSON files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Company slug to fetch (e.g. oracle, microsoft, phonepe)
    #[arg(short, long)]
    slug: String,

    /// Number of pages to fetch
    #[arg(short, long, default_value_t = 53)]
    pages: u32,

    /// Output directory for the page files
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    /// Maximum number of in-flight requests
    #[arg(short, long, default_value_t = 5)]
    concurrency: usize,
}

/// Linearly increasing backoff between retry attempts.
fn retry_delay(attempt: u32) -> Duration {
    Duration::from_secs(RETRY_DELAY_SECS * u64::from(attempt))
}

fn page_file_name(page: u32) -> String {
    format!("page_{page}.json")
}

async fn fetch_page(client: &reqwest::Client, slug: &str, page: u32) -> Result<serde_json::Value> {
    let mut attempt = 1;
    loop {
        // Small random delay before each request to stay under the
        // endpoint's rate limit.
        let jitter = rand::rng().random_range(1.0..3.0);
        tokio::time::sleep(Duration::from_secs_f64(jitter)).await;

        let result = async {
            let response = client
                .get(BASE_URL)
                .query(&[
                    ("slug", slug),
                    ("page", page.to_string().as_str()),
                    ("naukri_request", "true"),
                ])
                .header("Referer", "https://www.naukri.com/")
                .send()
                .await?
                .error_for_status()?;
            response.json::<serde_json::Value>().await
        }
        .await;

        match result {
            Ok(body) => return Ok(body),
            Err(e) if attempt < MAX_RETRIES => {
                log::warn!("page {page}: attempt {attempt} failed: {e}");
                tokio::time::sleep(retry_delay(attempt)).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("page {page} failed after {MAX_RETRIES} attempts")
                });
            }
        }
    }
}

/// Fetch one page and write it out. Errors are logged, not propagated, so
/// sibling pages keep going.
async fn process_page(client: &reqwest::Client, slug: &str, page: u32, out: &Path) {
    let body = match fetch_page(client, slug, page).await {
        Ok(body) => body,
        Err(e) => {
            log::error!("giving up on page {page}: {e:#}");
            return;
        }
    };
    let path = out.join(page_file_name(page));
    let json = match serde_json::to_string_pretty(&body) {
        Ok(json) => json,
        Err(e) => {
            log::error!("failed to serialize page {page}: {e}");
            return;
        }
    };
    match tokio::fs::write(&path, json).await {
        Ok(()) => log::info!("saved page {page} to {}", path.display()),
        Err(e) => log::error!("failed to write {}: {e}", path.display()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create output directory {}", args.out.display()))?;

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;

    futures::stream::iter(
        (1..=args.pages).map(|page| process_page(&client, &args.slug, page, &args.out)),
    )
    .buffer_unordered(args.concurrency)
    .collect::<Vec<_>>()
    .await;

    println!(
        "Fetched {} pages for '{}' into {}",
        args.pages,
        args.slug,
        args.out.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_linearly() {
        assert_eq!(retry_delay(1), Duration::from_secs(5));
        assert_eq!(retry_delay(2), Duration::from_secs(10));
        assert_eq!(retry_delay(3), Duration::from_secs(15));
    }

    #[test]
    fn page_files_are_named_by_page_number() {
        assert_eq!(page_file_name(1), "page_1.json");
        assert_eq!(page_file_name(53), "page_53.json");
    }
}

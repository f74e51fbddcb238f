//! Fetching of the remote reading-list export.

use anyhow::{Context, Result};
use tokio::time::Duration;
use tracing::{debug, error, info};

use super::client::{get_success, ACCEPT_JSON};
use super::types::{CachePolicy, RawFeed};
use super::util::is_valid_url;
use crate::TARGET_WEB_REQUEST;

/// Fetch and parse the remote feed under `policy`.
///
/// Never fails: any problem is logged and an empty feed is returned so the
/// caller always has something to render. There are no retries.
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    policy: CachePolicy,
    limit: Duration,
) -> RawFeed {
    match try_fetch_feed(client, url, policy, limit).await {
        Ok(feed) => {
            info!(target: TARGET_WEB_REQUEST, "Loaded {} feed items from {}", feed.items.len(), url);
            feed
        }
        Err(err) => {
            error!(target: TARGET_WEB_REQUEST, "Failed to load feed from {}: {:#}", url, err);
            RawFeed::empty()
        }
    }
}

async fn try_fetch_feed(
    client: &reqwest::Client,
    url: &str,
    policy: CachePolicy,
    limit: Duration,
) -> Result<RawFeed> {
    if !is_valid_url(url) {
        anyhow::bail!("Invalid feed URL: {:?}", url);
    }

    let directive = policy.request_directive();
    debug!(target: TARGET_WEB_REQUEST, "Fetching feed {} with Cache-Control: {}", url, directive);

    let response = get_success(client, url, ACCEPT_JSON, Some(&directive), limit).await?;
    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?;

    debug!(target: TARGET_WEB_REQUEST, "First 200 characters of feed body: {}", body.chars().take(200).collect::<String>());

    serde_json::from_str::<RawFeed>(&body)
        .with_context(|| format!("Failed to parse JSON feed from {}", url))
}

//! HTTP client creation and request handling for feeds and article pages.

use anyhow::{anyhow, Result};
use reqwest::header;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::TARGET_WEB_REQUEST;

pub const DEFAULT_USER_AGENT: &str = concat!("reading-feed/", env!("CARGO_PKG_VERSION"));

pub const ACCEPT_JSON: &str = "application/feed+json, application/json;q=0.9, */*;q=0.1";
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.1";

/// Create the client shared by the feed fetcher and the Open-Graph scraper.
pub fn create_http_client(user_agent: &str) -> Result<reqwest::Client> {
    debug!(target: TARGET_WEB_REQUEST, "Creating HTTP client with user agent {}", user_agent);

    reqwest::Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))
}

/// Issue a single GET bounded by `limit`, failing on timeout and on non-2xx statuses.
pub async fn get_success(
    client: &reqwest::Client,
    url: &str,
    accept: &str,
    cache_control: Option<&str>,
    limit: Duration,
) -> Result<reqwest::Response> {
    let mut request = client.get(url).header(header::ACCEPT, accept);
    if let Some(directive) = cache_control {
        request = request.header(header::CACHE_CONTROL, directive);
    }

    let response = match timeout(limit, request.send()).await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => return Err(anyhow!("Request to {} failed: {}", url, err)),
        Err(_) => {
            return Err(anyhow!(
                "Request to {} timed out after {} ms",
                url,
                limit.as_millis()
            ))
        }
    };

    debug!(target: TARGET_WEB_REQUEST, "Request to {} returned status {}", url, response.status());

    if !response.status().is_success() {
        return Err(anyhow!("Non-success status {} from {}", response.status(), url));
    }

    Ok(response)
}

/// Lowercased `Content-Type` of a response, if any.
pub fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .map(|s| s.to_lowercase())
}

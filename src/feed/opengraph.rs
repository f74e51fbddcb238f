//! Open-Graph metadata scraping for article pages.

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::client::{content_type, get_success, ACCEPT_HTML};
use super::types::OgMetadata;
use super::util::{non_empty, resolve_url};
use crate::TARGET_WEB_REQUEST;

/// Open-Graph tags live in `<head>`; nothing past this many bytes is read.
pub const MAX_OG_BODY_BYTES: usize = 512 * 1024;

static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("valid meta selector"));

/// Fetch `url` and read its Open-Graph tags. The whole exchange, body
/// included, is bounded by `limit`.
pub async fn scrape_og(client: &reqwest::Client, url: &str, limit: Duration) -> Result<OgMetadata> {
    let html = timeout(limit, fetch_html(client, url, limit))
        .await
        .map_err(|_| anyhow!("Open-Graph scrape of {} timed out", url))??;

    let metadata = parse_og_tags(&html, url);
    debug!(target: TARGET_WEB_REQUEST, "Open-Graph tags for {}: {:?}", url, metadata);
    Ok(metadata)
}

async fn fetch_html(client: &reqwest::Client, url: &str, limit: Duration) -> Result<String> {
    let response = get_success(client, url, ACCEPT_HTML, None, limit).await?;

    if let Some(ct) = content_type(&response) {
        if !ct.contains("html") {
            bail!("Content at {} is not HTML ({})", url, ct);
        }
    }

    read_capped(response, MAX_OG_BODY_BYTES)
        .await
        .with_context(|| format!("Failed to read page body from {}", url))
}

/// Read at most `cap` bytes of the body and decode them lossily as UTF-8.
async fn read_capped(mut response: reqwest::Response, cap: usize) -> Result<String> {
    let mut body: Vec<u8> = Vec::new();

    while let Some(chunk) = response.chunk().await? {
        let room = cap - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            debug!(target: TARGET_WEB_REQUEST, "Truncated page body at {} bytes", cap);
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Extract `og:description`, `og:site_name` and `og:image` from an HTML document.
///
/// Both `property=` and `name=` attributes are accepted. When a tag repeats the
/// first non-empty value wins. A relative image is resolved against `page_url`.
pub fn parse_og_tags(html: &str, page_url: &str) -> OgMetadata {
    let document = Html::parse_document(html);
    let mut metadata = OgMetadata::default();

    for element in document.select(&META_SELECTOR) {
        let value = element.value();
        let Some(key) = value.attr("property").or_else(|| value.attr("name")) else {
            continue;
        };
        let Some(content) = non_empty(value.attr("content")) else {
            continue;
        };

        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "og:description" => &mut metadata.description,
            "og:site_name" => &mut metadata.site_name,
            "og:image" | "og:image:url" => &mut metadata.image,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(content.to_string());
        }
    }

    if let Some(image) = metadata.image.take() {
        metadata.image = resolve_url(page_url, &image);
    }

    metadata
}

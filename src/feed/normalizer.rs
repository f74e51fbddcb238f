//! Mapping of raw feed items into canonical articles.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::extract::{self, first_present};
use super::opengraph::scrape_og;
use super::types::{
    CanonicalArticle, OgMetadata, RawFeedItem, DEAD_LINK, NO_DESCRIPTION, OG_CONCURRENCY,
    OG_REQUEST_TIMEOUT, PLACEHOLDER_IMAGE_URL, UNTITLED,
};
use super::util::{format_display_date, format_iso_date, is_valid_url, parse_date};
use crate::TARGET_FEED;

/// Publication timestamp of an item, from the first date field present.
pub fn published_at(raw: &RawFeedItem) -> Option<DateTime<Utc>> {
    first_present(raw, extract::DATE).and_then(parse_date)
}

/// Build the canonical article for `raw`, using `og` when a scrape succeeded.
///
/// This is the only place the fallback chain lives; the list view and the RSS
/// serializer both go through it.
pub fn normalize_item(raw: &RawFeedItem, og: Option<&OgMetadata>) -> CanonicalArticle {
    let url = first_present(raw, extract::LINK);
    let og = og.cloned().unwrap_or_default();

    let description = first_present(raw, extract::DESCRIPTION)
        .map(str::to_string)
        .or(og.description)
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    let (date_display, date_iso) = match published_at(raw) {
        Some(date) => (format_display_date(&date), format_iso_date(&date)),
        None => {
            if let Some(raw_date) = first_present(raw, extract::DATE) {
                debug!(target: TARGET_FEED, "Ignoring unparsable date {:?}", raw_date);
            }
            (String::new(), String::new())
        }
    };

    CanonicalArticle {
        id: url
            .map(str::to_string)
            .unwrap_or_else(|| format!("item-{}", Uuid::new_v4())),
        title: first_present(raw, extract::TITLE)
            .unwrap_or(UNTITLED)
            .to_string(),
        href: url.unwrap_or(DEAD_LINK).to_string(),
        description,
        publication_name: og.site_name.unwrap_or_default(),
        date_display,
        date_iso,
        image_url: og
            .image
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
    }
}

/// Tuning for the enrichment pass.
#[derive(Debug, Clone, Copy)]
pub struct NormalizerOptions {
    /// Scrape Open-Graph tags for items with a URL.
    pub enrich: bool,
    pub og_timeout: Duration,
    /// Maximum number of scrapes in flight at once.
    pub concurrency: usize,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            enrich: true,
            og_timeout: OG_REQUEST_TIMEOUT,
            concurrency: OG_CONCURRENCY,
        }
    }
}

/// Normalizes a batch of items, enriching each one from its own page.
#[derive(Clone)]
pub struct Normalizer {
    client: reqwest::Client,
    options: NormalizerOptions,
}

impl Normalizer {
    pub fn new(client: reqwest::Client, options: NormalizerOptions) -> Self {
        Self { client, options }
    }

    /// One article per item, in input order. Individual scrape failures only
    /// cost that item its enrichment.
    pub async fn normalize_all(&self, items: Vec<RawFeedItem>) -> Vec<CanonicalArticle> {
        let total = items.len();
        let articles: Vec<CanonicalArticle> = stream::iter(items)
            .map(|item| async move { self.normalize_one(&item).await })
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        debug!(target: TARGET_FEED, "Normalized {} of {} feed items", articles.len(), total);
        articles
    }

    pub async fn normalize_one(&self, raw: &RawFeedItem) -> CanonicalArticle {
        let og = match first_present(raw, extract::LINK) {
            Some(url) if self.options.enrich => self.enrich(url).await,
            _ => None,
        };
        normalize_item(raw, og.as_ref())
    }

    async fn enrich(&self, url: &str) -> Option<OgMetadata> {
        if !is_valid_url(url) {
            warn!(target: TARGET_FEED, "Skipping Open-Graph scrape of invalid URL {:?}", url);
            return None;
        }

        match scrape_og(&self.client, url, self.options.og_timeout).await {
            Ok(og) if og.is_empty() => {
                debug!(target: TARGET_FEED, "No Open-Graph tags found at {}", url);
                None
            }
            Ok(og) => Some(og),
            Err(err) => {
                warn!(target: TARGET_FEED, "Open-Graph scrape failed for {}: {:#}", url, err);
                None
            }
        }
    }
}

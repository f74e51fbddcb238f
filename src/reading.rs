//! The reading list as served to readers and feed consumers.

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::environment::Settings;
use crate::feed::{
    build_rss, fetch_feed, CachePolicy, CanonicalArticle, Normalizer, NormalizerOptions,
};
use crate::TARGET_FEED;

/// Fetch-and-normalize entry points shared by the HTTP routes and the CLI.
#[derive(Clone)]
pub struct ReadingList {
    client: reqwest::Client,
    settings: Settings,
}

impl ReadingList {
    pub fn new(client: reqwest::Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    /// Policy of the cached reading page.
    pub fn hourly_policy(&self) -> CachePolicy {
        CachePolicy::TimeBound {
            ttl_seconds: self.settings.feed_ttl_seconds,
        }
    }

    /// Fetch the feed under `policy` and normalize every item.
    ///
    /// A feed that cannot be loaded yields an empty list.
    pub async fn articles(&self, policy: CachePolicy, enrich: bool) -> Result<Vec<CanonicalArticle>> {
        let url = self.settings.require_feed_url()?;
        let feed = fetch_feed(&self.client, url, policy, self.settings.feed_timeout).await;

        let normalizer = Normalizer::new(
            self.client.clone(),
            NormalizerOptions {
                enrich,
                og_timeout: self.settings.og_timeout,
                concurrency: self.settings.og_concurrency,
            },
        );
        let articles = normalizer.normalize_all(feed.items).await;
        info!(target: TARGET_FEED, "Prepared {} articles ({:?})", articles.len(), policy);
        Ok(articles)
    }

    /// Fetch the feed uncached and render it as RSS, without enrichment.
    pub async fn rss(&self) -> Result<String> {
        let url = self.settings.require_feed_url()?;
        let feed = fetch_feed(
            &self.client,
            url,
            CachePolicy::NoStore,
            self.settings.feed_timeout,
        )
        .await;
        build_rss(&feed.items, &self.settings.site, Utc::now())
    }
}

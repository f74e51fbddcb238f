//! Type definitions for the feed module.

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Title used when a feed item carries none.
pub const UNTITLED: &str = "Untitled";

/// Link used when a feed item carries no URL.
pub const DEAD_LINK: &str = "#";

/// Description used when neither the item nor its page provides one.
pub const NO_DESCRIPTION: &str = "No description found";

/// Image shown when no Open-Graph image could be scraped.
pub const PLACEHOLDER_IMAGE_URL: &str = "/images/placeholder.png";

/// `s-maxage` applied to the RSS document (one year).
pub const RSS_CACHE_CONTROL: &str = "s-maxage=31556952";

pub const FEED_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const OG_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const OG_CONCURRENCY: usize = 4;

/// One entry of the remote read-later export. Nothing is guaranteed to be present.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawFeedItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content_text: Option<String>,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub date_published: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub pub_date: Option<String>,
}

/// JSON feed structure for parsing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawFeed {
    #[serde(default)]
    pub items: Vec<RawFeedItem>,
}

impl RawFeed {
    /// The renderable result handed back when the feed could not be loaded.
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

/// Normalized article, every field always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalArticle {
    pub id: String,
    pub title: String,
    pub href: String,
    pub description: String,
    pub publication_name: String,
    pub date_display: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub image_url: String,
}

/// Metadata scraped from a page's `<meta property="og:*">` tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OgMetadata {
    pub description: Option<String>,
    pub site_name: Option<String>,
    pub image: Option<String>,
}

impl OgMetadata {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.site_name.is_none() && self.image.is_none()
    }
}

/// How fresh the remote feed has to be for a given consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    NoStore,
    NoCache,
    TimeBound { ttl_seconds: u64 },
}

impl CachePolicy {
    /// Value sent as `Cache-Control` on the outbound feed request.
    pub fn request_directive(&self) -> String {
        match self {
            CachePolicy::NoStore => "no-store".to_string(),
            CachePolicy::NoCache => "no-cache".to_string(),
            CachePolicy::TimeBound { ttl_seconds } => format!("max-age={}", ttl_seconds),
        }
    }

    /// Value sent as `Cache-Control` on responses rendered from this feed.
    pub fn response_directive(&self) -> String {
        match self {
            CachePolicy::NoStore => "no-store".to_string(),
            CachePolicy::NoCache => "no-cache".to_string(),
            CachePolicy::TimeBound { ttl_seconds } => {
                format!("public, max-age={}", ttl_seconds)
            }
        }
    }
}

/// Fixed channel identity used when syndicating the reading list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author_name: String,
    pub author_email: String,
    pub language: String,
}

impl SiteIdentity {
    /// RSS `author` element format: `email (Name)`.
    pub fn rss_author(&self) -> String {
        format!("{} ({})", self.author_email, self.author_name)
    }
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            title: "Reading List".to_string(),
            link: "https://example.com".to_string(),
            description: "Articles I liked recently".to_string(),
            author_name: "Site Owner".to_string(),
            author_email: "owner@example.com".to_string(),
            language: "en-us".to_string(),
        }
    }
}

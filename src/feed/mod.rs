//! Reading-list feed ingestion.
//!
//! This module handles fetching the remote JSON export, normalizing its items
//! into canonical articles, and serializing them as RSS.

mod client;
mod extract;
mod fetcher;
mod normalizer;
mod opengraph;
mod syndication;
mod types;
mod util;

pub use self::types::*;

pub use self::client::{create_http_client, DEFAULT_USER_AGENT};
pub use self::extract::{first_present, Extractor};
pub use self::fetcher::fetch_feed;
pub use self::normalizer::{normalize_item, published_at, Normalizer, NormalizerOptions};
pub use self::opengraph::{parse_og_tags, scrape_og};
pub use self::syndication::build_rss;
pub use self::util::{is_valid_url, parse_date};

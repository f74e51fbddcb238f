//! RSS 2.0 serialization of the reading list.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rss::{validation::Validate, ChannelBuilder, GuidBuilder, ItemBuilder};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::extract::{self, first_present};
use super::normalizer::{normalize_item, published_at};
use super::types::{RawFeedItem, SiteIdentity};
use super::util::is_valid_url;
use crate::TARGET_FEED;

const GENERATOR: &str = concat!("reading-feed ", env!("CARGO_PKG_VERSION"));

/// Serialize `items` as an RSS 2.0 document under the fixed site identity.
///
/// No Open-Graph enrichment happens here. Items without a parsable date are
/// stamped with `now`.
pub fn build_rss(items: &[RawFeedItem], identity: &SiteIdentity, now: DateTime<Utc>) -> Result<String> {
    let author = identity.rss_author();
    let entries: Vec<rss::Item> = items
        .iter()
        .map(|raw| to_rss_item(raw, &author, now))
        .collect();

    debug!(target: TARGET_FEED, "Serializing {} items to RSS", entries.len());

    let channel = ChannelBuilder::default()
        .title(identity.title.clone())
        .link(identity.link.clone())
        .description(identity.description.clone())
        .language(Some(identity.language.clone()))
        .managing_editor(Some(author))
        .generator(Some(GENERATOR.to_string()))
        .last_build_date(Some(now.to_rfc2822()))
        .items(entries)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
    Ok(channel.to_string())
}

fn to_rss_item(raw: &RawFeedItem, author: &str, now: DateTime<Utc>) -> rss::Item {
    let article = normalize_item(raw, None);
    let pub_date = published_at(raw).unwrap_or(now).to_rfc2822();

    // Anything that is not an absolute http(s) URL would fail channel validation.
    let has_link = is_valid_url(&article.href);
    let guid = if has_link {
        GuidBuilder::default()
            .permalink(true)
            .value(article.href.clone())
            .build()
    } else {
        debug!(target: TARGET_FEED, "Omitting link {:?} from RSS item", article.href);
        GuidBuilder::default()
            .permalink(false)
            .value(content_guid(raw, &article.title, &article.description))
            .build()
    };

    ItemBuilder::default()
        .title(Some(article.title))
        .link(has_link.then_some(article.href))
        .description(Some(article.description))
        .author(Some(author.to_string()))
        .guid(Some(guid))
        .pub_date(Some(pub_date))
        .build()
}

/// Stable guid for items without a usable link, so readers that deduplicate
/// by guid see the same value on every request.
fn content_guid(raw: &RawFeedItem, title: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [title, first_present(raw, extract::DATE).unwrap_or_default(), description] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = format!("{:x}", hasher.finalize());
    format!("item-{}", &digest[..16])
}

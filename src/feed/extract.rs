//! Ordered field extractors for raw feed items.
//!
//! Each canonical field has a priority list of extractors. The first one that
//! yields a non-empty value wins.

use super::types::RawFeedItem;
use super::util::non_empty;

pub type Extractor = fn(&RawFeedItem) -> Option<&str>;

fn title(item: &RawFeedItem) -> Option<&str> {
    item.title.as_deref()
}

fn url(item: &RawFeedItem) -> Option<&str> {
    item.url.as_deref()
}

fn content_text(item: &RawFeedItem) -> Option<&str> {
    item.content_text.as_deref()
}

fn content_html(item: &RawFeedItem) -> Option<&str> {
    item.content_html.as_deref()
}

fn description(item: &RawFeedItem) -> Option<&str> {
    item.description.as_deref()
}

fn summary(item: &RawFeedItem) -> Option<&str> {
    item.summary.as_deref()
}

fn date_published(item: &RawFeedItem) -> Option<&str> {
    item.date_published.as_deref()
}

fn pub_date(item: &RawFeedItem) -> Option<&str> {
    item.pub_date.as_deref()
}

pub const TITLE: &[Extractor] = &[title];
pub const LINK: &[Extractor] = &[url];
pub const DESCRIPTION: &[Extractor] = &[content_text, content_html, description, summary];
pub const DATE: &[Extractor] = &[date_published, pub_date];

/// Run `extractors` in order and return the first non-empty value.
pub fn first_present<'a>(item: &'a RawFeedItem, extractors: &[Extractor]) -> Option<&'a str> {
    extractors
        .iter()
        .find_map(|extract| non_empty(extract(item)))
}

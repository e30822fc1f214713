use chrono::{Local, NaiveDateTime};
use html_escape::decode_html_entities;

use crate::app::{FlickfeedError, Result};
use crate::domain::{FeedResponse, ImageItem, RawFeedItem};

/// Timestamp layout used by the feed (`published`), always UTC.
pub const FEED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// Layout shown to the user, in local time.
pub const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y %H:%M:%S";

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw response body and map every item, keeping server order.
    pub fn normalize(&self, body: &[u8]) -> Result<Vec<ImageItem>> {
        let feed = self.parse(body)?;
        Ok(feed.items.into_iter().map(|item| self.map_item(item)).collect())
    }

    pub fn parse(&self, body: &[u8]) -> Result<FeedResponse> {
        let text = String::from_utf8_lossy(body);
        let cleaned = unescape_apostrophes(&text);
        serde_json::from_str(&cleaned).map_err(|e| FlickfeedError::FeedParse(e.to_string()))
    }

    pub fn map_item(&self, raw: RawFeedItem) -> ImageItem {
        ImageItem {
            title: decode_html_entities(&raw.title).to_string(),
            author: author_name(&raw.author),
            image_link: raw.media.m,
            published_at: format_published(&raw.published),
            description: raw.description,
            link: raw.link,
            tags: raw.tags.split_whitespace().map(String::from).collect(),
        }
    }
}

/// Render a feed timestamp in local time, or hand it back untouched if it
/// doesn't match [`FEED_DATE_FORMAT`].
pub fn format_published(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, FEED_DATE_FORMAT) {
        Ok(naive) => naive
            .and_utc()
            .with_timezone(&Local)
            .format(DISPLAY_DATE_FORMAT)
            .to_string(),
        Err(e) => {
            tracing::trace!("Keeping unparsed timestamp {:?}: {}", raw, e);
            raw.to_string()
        }
    }
}

/// Flickr sends authors as `nobody@flickr.com ("name")`.
fn author_name(raw: &str) -> String {
    let name = raw
        .find("(\"")
        .and_then(|start| {
            let rest = &raw[start + 2..];
            rest.rfind("\")").map(|end| &rest[..end])
        })
        .unwrap_or(raw);
    decode_html_entities(name.trim()).to_string()
}

/// The feed escapes apostrophes as `\'`, which JSON doesn't allow.
fn unescape_apostrophes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\'') => out.push('\''),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }

    out
}

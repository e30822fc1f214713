use serde::{Deserialize, Serialize};

/// A feed item ready for display.
///
/// Built once by the normalizer and shared behind `Arc` afterwards; nothing
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    pub title: String,
    pub author: String,
    pub image_link: String,
    /// Formatted local time, or the server string verbatim if it didn't parse.
    pub published_at: String,
    /// Raw description, markup included.
    pub description: String,
    /// Photo page on flickr.com.
    pub link: String,
    pub tags: Vec<String>,
}

impl ImageItem {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    pub fn display_author(&self) -> &str {
        if self.author.is_empty() {
            "unknown"
        } else {
            &self.author
        }
    }
}

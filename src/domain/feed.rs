use serde::{Deserialize, Serialize};

/// Top-level document returned by `photos_public.gne`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedResponse {
    pub title: String,
    pub link: String,
    pub description: String,
    pub modified: String,
    pub generator: String,
    pub items: Vec<RawFeedItem>,
}

/// One photo record, shaped exactly as the server sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeedItem {
    pub title: String,
    pub link: String,
    pub media: Media,
    pub date_taken: String,
    pub description: String,
    pub published: String,
    pub author: String,
    pub author_id: String,
    pub tags: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    /// Medium-sized image URL.
    pub m: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let item: RawFeedItem = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(item.title, "Only a title");
        assert_eq!(item.media.m, "");
        assert_eq!(item.published, "");
    }

    #[test]
    fn test_deserialize_response() {
        let body = r#"{
            "title": "Recent Uploads tagged cat",
            "link": "https://www.flickr.com/photos/tags/cat/",
            "items": [
                {
                    "title": "Tabby",
                    "media": {"m": "https://live.staticflickr.com/1/2_m.jpg"},
                    "published": "2024-03-01T10:00:00Z",
                    "author": "nobody@flickr.com (\"alice\")"
                }
            ]
        }"#;

        let response: FeedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].media.m, "https://live.staticflickr.com/1/2_m.jpg");
    }
}

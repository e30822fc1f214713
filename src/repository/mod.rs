use std::sync::Arc;

use async_trait::async_trait;

use crate::app::{FlickfeedError, Result};
use crate::domain::ImageItem;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

/// Search term sent when the user hasn't typed anything.
pub const DEFAULT_QUERY: &str = "nature";

#[async_trait]
pub trait ImageRepository {
    /// Fetch and map the feed for `query`. Never sends an empty search and
    /// treats an empty feed as an error.
    async fn fetch_search_data(&self, query: Option<&str>) -> Result<Vec<ImageItem>>;
}

pub struct FeedRepository {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    default_query: String,
}

impl FeedRepository {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, normalizer: Normalizer) -> Self {
        Self::with_default_query(fetcher, normalizer, DEFAULT_QUERY)
    }

    pub fn with_default_query(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        normalizer: Normalizer,
        default_query: &str,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            default_query: default_query.to_string(),
        }
    }

    fn resolve_query<'a>(&'a self, query: Option<&'a str>) -> &'a str {
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => self.default_query.as_str(),
        }
    }
}

#[async_trait]
impl ImageRepository for FeedRepository {
    async fn fetch_search_data(&self, query: Option<&str>) -> Result<Vec<ImageItem>> {
        let tags = self.resolve_query(query);
        let body = self.fetcher.fetch(tags).await?;
        let items = self.normalizer.normalize(&body)?;

        if items.is_empty() {
            tracing::info!("No images for {:?}", tags);
            return Err(FlickfeedError::EmptyResult);
        }

        tracing::info!("Fetched {} images for {:?}", items.len(), tags);
        Ok(items)
    }
}

pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

/// Endpoint path, relative to the configured base URL.
pub const FEED_PATH: &str = "services/feeds/photos_public.gne";

#[async_trait]
pub trait Fetcher {
    /// Fetch the public-photos feed for `tags` and return the raw body.
    async fn fetch(&self, tags: &str) -> Result<Vec<u8>>;
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::Result;
use crate::fetcher::{Fetcher, FEED_PATH};

pub const DEFAULT_BASE_URL: &str = "https://api.flickr.com/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct HttpFetcher {
    client: Client,
    endpoint: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("flickfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint_url(base_url)?,
        })
    }

    /// Full request URL for a tag search.
    pub fn feed_url(&self, tags: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("tags", tags)
            .append_pair("format", "json")
            .append_pair("nojsoncallback", "1");
        url
    }
}

/// Resolve the feed endpoint against `base_url`, tolerating a missing
/// trailing slash.
fn endpoint_url(base_url: &str) -> Result<Url> {
    let base = if base_url.ends_with('/') {
        Url::parse(base_url)?
    } else {
        Url::parse(&format!("{}/", base_url))?
    };
    Ok(base.join(FEED_PATH)?)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, tags: &str) -> Result<Vec<u8>> {
        let url = self.feed_url(tags);
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let body = response.bytes().await?.to_vec();
        tracing::debug!("Received {} bytes for tags={:?}", body.len(), tags);
        Ok(body)
    }
}

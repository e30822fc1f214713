use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::connectivity::{InterfaceProbe, NetworkProbe};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::repository::{FeedRepository, ImageRepository};
use crate::search::{SearchController, SearchHandle};
use crate::usecase::SearchImages;

/// Wires fetcher, repository and use case together from a [`Config`].
pub struct AppContext {
    pub config: Config,
    pub search: SearchImages,
    pub probe: Arc<dyn NetworkProbe + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_timeout(
            &config.api.base_url,
            config.api.timeout(),
        )?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let repository: Arc<dyn ImageRepository + Send + Sync> =
            Arc::new(FeedRepository::with_default_query(
                fetcher,
                Normalizer::new(),
                &config.search.default_query,
            ));
        Self {
            config,
            search: SearchImages::new(repository),
            probe: Arc::new(InterfaceProbe::new()),
        }
    }

    /// Start a search session. Must be called inside a tokio runtime.
    pub fn start_session(&self) -> SearchHandle {
        SearchController::spawn(self.search.clone(), self.config.search.debounce())
    }
}

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::app::{FlickfeedError, Result};
use crate::domain::ImageItem;
use crate::repository::ImageRepository;

/// Single-shot image search, run on the tokio runtime rather than on the
/// caller's task.
#[derive(Clone)]
pub struct SearchImages {
    repository: Arc<dyn ImageRepository + Send + Sync>,
}

impl SearchImages {
    pub fn new(repository: Arc<dyn ImageRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Spawn the search. The handle yields exactly one result or one failure.
    pub fn execute(&self, query: Option<String>) -> JoinHandle<Result<Vec<ImageItem>>> {
        let repository = self.repository.clone();
        tokio::spawn(async move { repository.fetch_search_data(query.as_deref()).await })
    }

    /// Spawn the search and wait for it.
    pub async fn run(&self, query: Option<String>) -> Result<Vec<ImageItem>> {
        join_result(self.execute(query).await)
    }
}

pub(crate) fn join_result(
    joined: std::result::Result<Result<Vec<ImageItem>>, tokio::task::JoinError>,
) -> Result<Vec<ImageItem>> {
    joined.map_err(|e| FlickfeedError::Task(e.to_string()))?
}

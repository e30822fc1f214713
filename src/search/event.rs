use std::sync::Arc;

use crate::domain::ImageItem;

/// Everything the presentation layer can ask of a search session.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Fetch right away, skipping the debounce.
    InitiateSearch(Option<String>),
    /// The search box changed. An empty string resets the session.
    QueryChanged(String),
    OnError(String),
    ErrorDismissed,
    UpdateCurrentItem(Arc<ImageItem>),
}

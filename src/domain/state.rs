use std::sync::Arc;

use crate::domain::ImageItem;

/// Everything the presentation layer needs to draw one frame of a search
/// session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: Option<String>,
    pub is_loading: bool,
    /// Server order.
    pub results: Vec<Arc<ImageItem>>,
    pub error: Option<String>,
    pub current_item: Option<Arc<ImageItem>>,
}

impl SearchState {
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

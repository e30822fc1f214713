//! The only place `SearchState` transitions happen.

use std::sync::Arc;

use crate::domain::{ImageItem, SearchState};

/// A state transition, after the controller has dealt with side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    Loading,
    QueryUpdated(String),
    Cleared,
    Loaded(Vec<Arc<ImageItem>>),
    Failed(String),
    ErrorDismissed,
    Selected(Arc<ImageItem>),
}

/// Produce the next state. Every change except `Selected` drops the current
/// selection.
pub fn reduce(state: SearchState, change: StateChange) -> SearchState {
    match change {
        StateChange::Loading => SearchState {
            is_loading: true,
            error: None,
            current_item: None,
            ..state
        },

        StateChange::QueryUpdated(query) => SearchState {
            query: Some(query),
            current_item: None,
            ..state
        },

        StateChange::Cleared => SearchState {
            query: None,
            is_loading: false,
            results: Vec::new(),
            current_item: None,
            ..state
        },

        StateChange::Loaded(results) => SearchState {
            is_loading: false,
            results,
            error: None,
            current_item: None,
            ..state
        },

        StateChange::Failed(message) => SearchState {
            is_loading: false,
            results: Vec::new(),
            error: Some(message),
            current_item: None,
            ..state
        },

        StateChange::ErrorDismissed => SearchState {
            error: None,
            current_item: None,
            ..state
        },

        StateChange::Selected(item) => SearchState {
            current_item: Some(item),
            ..state
        },
    }
}

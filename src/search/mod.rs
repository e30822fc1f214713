//! Search session state management.
//!
//! ```text
//! SearchEvent ──→ SearchController ──→ reduce() ──→ SearchState (watch)
//!                      │    ↑
//!          debounce ───┘    └─── fetch completion (generation-tagged)
//! ```

pub mod controller;
pub mod event;
pub mod reducer;

pub use controller::{SearchController, SearchHandle, DEFAULT_DEBOUNCE};
pub use event::SearchEvent;
pub use reducer::{reduce, StateChange};

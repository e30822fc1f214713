pub mod feed;
pub mod item;
pub mod state;

pub use feed::{FeedResponse, Media, RawFeedItem};
pub use item::ImageItem;
pub use state::SearchState;

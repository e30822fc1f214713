pub mod context;
pub mod error;

pub use context::AppContext;
pub use error::{FlickfeedError, Result};

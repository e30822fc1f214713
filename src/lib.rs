//! # Flickfeed
//!
//! A terminal client for searching Flickr's public photo feed.
//!
//! ## Architecture
//!
//! A search flows through a layered pipeline:
//!
//! ```text
//! UI event → SearchController → SearchImages → Repository → Fetcher → Normalizer
//!                  ↑                                                     │
//!                  └──────────────────── SearchState ←───────────────────┘
//! ```
//!
//! - [`fetcher`]: HTTP client for the public feed endpoint
//! - [`normalizer`]: Maps raw feed items to display-ready view models
//! - [`search`]: Debounced state controller owning [`SearchState`](domain::SearchState)
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # One-shot search
//! flickfeed search "red panda"
//!
//! # Same thing as JSON
//! flickfeed search kittens --json
//!
//! # Launch TUI
//! flickfeed tui --log /tmp/flickfeed.log
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`domain`]: Core domain models (FeedResponse, ImageItem, SearchState)
//! - [`repository`]: Query substitution and empty-result handling
//! - [`usecase`]: Background search task
//! - [`connectivity`]: Network interface probe for error copy

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// fetcher, normalizer, repository, use case.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/flickfeed/config.toml`, supporting:
/// - API host and request timeout
/// - Default search term and debounce window
/// - Custom colors (named or hex)
pub mod config;

/// Command-line interface using clap.
///
/// - `search [query] [--json]` - Run one search and print the results
/// - `tui` - Launch the TUI
pub mod cli;

/// Reports whether any network interface is up.
pub mod connectivity;

/// Core domain models.
///
/// - [`RawFeedItem`](domain::RawFeedItem): Item as the server sends it
/// - [`ImageItem`](domain::ImageItem): Display-ready view model
/// - [`SearchState`](domain::SearchState): Snapshot rendered by the UI
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and mapping into [`ImageItem`](domain::ImageItem)s.
pub mod normalizer;

pub mod repository;

/// Search session state management.
///
/// Debounces query changes, keeps only the latest fetch alive and folds
/// every outcome into [`SearchState`](domain::SearchState) through one reducer.
pub mod search;

/// Terminal user interface.
///
/// Search bar on top, result grid below. Wide terminals show the detail
/// pane next to the grid, narrow ones swap it in.
///
/// Keybindings: type to search, arrows navigate, Enter opens details,
/// Ctrl+R refreshes, Ctrl+O opens the image, Esc goes back.
pub mod tui;

pub mod usecase;

//! # Openshelf
//!
//! Client-side data layer for a bibliographic catalog browser.
//!
//! ## Architecture
//!
//! Openshelf follows a modular pipeline architecture:
//!
//! ```text
//! Dispatcher → Fetcher → Normalizer → result set
//!                                         │
//! Favorites / History / Reviews ← JsonStore
//! ```
//!
//! - [`search`]: query dispatch with single-flight response handling
//! - [`normalizer`]: converts raw search documents to the unified [`Book`](domain::Book) model
//! - [`collections`]: the three persistent collections and their aggregates
//! - [`store`]: write-through JSON blob persistence
//!
//! ## Quick Start
//!
//! ```no_run
//! use openshelf::app::AppContext;
//! use openshelf::config::Config;
//! use openshelf::domain::SearchKind;
//!
//! # async fn run() -> openshelf::app::Result<()> {
//! let config = Config::default();
//! let ctx = AppContext::new(&config)?;
//!
//! let books = ctx.search("dune", SearchKind::Title).await?;
//! ctx.favorites.toggle(&books[0]);
//! # Ok(())
//! # }
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// store, fetcher, dispatcher, and the three collections.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/openshelf/config.toml`, supporting:
/// - API base URLs and request tuning
/// - The data directory for persisted collections
pub mod config;

/// Core domain models.
///
/// - [`Book`](domain::Book): normalized catalog entry
/// - [`SearchHistoryEntry`](domain::SearchHistoryEntry): one cached past search
/// - [`Review`](domain::Review): a stored user review, built from a validated
///   [`ReviewDraft`](domain::ReviewDraft)
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for the transport seam
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Search document normalization.
///
/// Converts raw `search.json` documents into unified
/// [`Book`](domain::Book) structs, dropping invalid entries.
pub mod normalizer;

/// Query dispatch.
///
/// [`SearchDispatcher`](search::SearchDispatcher) builds outbound requests,
/// publishes the current result set, and discards stale responses.
pub mod search;

/// The persistent collections.
///
/// - [`Favorites`](collections::Favorites): unique-by-key toggle set
/// - [`SearchHistory`](collections::SearchHistory): bounded, deduplicating cache
/// - [`Reviews`](collections::Reviews): review store with derived aggregates
pub mod collections;

/// JSON blob persistence.
///
/// [`JsonStore`](store::JsonStore): write-through, collection-agnostic store
/// with on-disk and in-memory backends.
pub mod store;

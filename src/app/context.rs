use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{Result, ShelfError};
use crate::collections::{Favorites, Reviews, SearchHistory};
use crate::config::Config;
use crate::domain::{Book, SearchKind};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::search::SearchDispatcher;
use crate::store::JsonStore;

/// Wires the data layer together: store, fetcher, dispatcher, and the
/// three persistent collections. The presentation layer owns one of these
/// for the lifetime of a session.
pub struct AppContext {
    pub store: Arc<JsonStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub dispatcher: SearchDispatcher,
    pub favorites: Favorites,
    pub history: SearchHistory,
    pub reviews: Reviews,
}

impl AppContext {
    /// Build a context over the configured (or default) data directory.
    pub fn new(config: &Config) -> Result<Self> {
        let data_dir = match &config.storage.data_dir {
            Some(p) => p.clone(),
            None => Self::default_data_dir()?,
        };

        let store = Arc::new(JsonStore::open(&data_dir)?);
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_timeout(
            Duration::from_secs(config.api.timeout_secs),
        ));
        Ok(Self::assemble(store, fetcher, config))
    }

    /// A fully in-memory context: nothing touches the filesystem.
    pub fn in_memory() -> Self {
        let config = Config::default();
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new());
        Self::assemble(Arc::new(JsonStore::in_memory()), fetcher, &config)
    }

    /// Full injection, for tests that substitute the transport.
    pub fn with_parts(
        store: Arc<JsonStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        config: &Config,
    ) -> Self {
        Self::assemble(store, fetcher, config)
    }

    fn assemble(
        store: Arc<JsonStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        config: &Config,
    ) -> Self {
        let normalizer = Normalizer::new(&config.api.covers_base_url);
        let dispatcher = SearchDispatcher::new(
            fetcher.clone(),
            normalizer,
            &config.api.base_url,
            config.api.result_limit,
        );
        let favorites = Favorites::load(store.clone());
        let history = SearchHistory::load(store.clone());
        let reviews = Reviews::load(store.clone());

        Self {
            store,
            fetcher,
            dispatcher,
            favorites,
            history,
            reviews,
        }
    }

    /// Run one search and record it in the history cache.
    ///
    /// Only a search that published results is recorded; blank queries,
    /// failures, and empty result sets leave the history untouched.
    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<Book>> {
        let books = self.dispatcher.search(query, kind).await?;
        self.history.record(query, kind, books.len());
        Ok(books)
    }

    fn default_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ShelfError::Config("Could not find data directory".into()))?;
        Ok(data_dir.join("openshelf"))
    }
}

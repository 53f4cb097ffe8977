use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use url::Url;

use crate::app::{Result, ShelfError};
use crate::domain::{Book, SearchKind, WorkDetail};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

/// Fixed cap on results requested per search.
pub const RESULT_LIMIT: u32 = 50;

/// Builds outbound search requests, normalizes responses, and publishes the
/// current result set.
///
/// Searches are single-flight by dispatch order: each call takes a sequence
/// token, and a response whose token is no longer the latest is discarded
/// ([`ShelfError::Superseded`]) so a slow response can never overwrite a
/// newer one. `in_progress` is true while any call is outstanding, letting
/// callers gate their submit action.
pub struct SearchDispatcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    base_url: String,
    limit: u32,
    seq: AtomicU64,
    pending: AtomicUsize,
    results: Mutex<Vec<Book>>,
}

impl SearchDispatcher {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        normalizer: Normalizer,
        base_url: impl Into<String>,
        limit: u32,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            fetcher,
            normalizer,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
            seq: AtomicU64::new(0),
            pending: AtomicUsize::new(0),
            results: Mutex::new(Vec::new()),
        }
    }

    /// The currently published result set.
    pub fn results(&self) -> Vec<Book> {
        self.lock_results().clone()
    }

    /// True while a search is outstanding.
    pub fn in_progress(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Run one search and publish its results.
    ///
    /// A blank query fails without a network call and leaves the previous
    /// result set intact; any dispatched search clears it first.
    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<Book>> {
        if query.trim().is_empty() {
            return Err(ShelfError::EmptyQuery);
        }

        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_results().clear();

        let url = self.search_url(query, kind)?;
        let _pending = PendingGuard::enter(&self.pending);
        debug!(query, field = kind.query_param(), "dispatching search");

        let body = self.fetcher.get(url.as_str()).await?;
        let books = self.normalizer.parse_page(&body)?;

        {
            let mut results = self.lock_results();
            if self.seq.load(Ordering::SeqCst) != token {
                debug!(query, "discarding stale search response");
                return Err(ShelfError::Superseded);
            }
            if books.is_empty() {
                return Err(ShelfError::NoResults(query.to_string()));
            }
            *results = books.clone();
        }

        debug!(query, count = books.len(), "published search results");
        Ok(books)
    }

    /// Fetch best-effort extra detail for one work. Failures yield `None`.
    pub async fn detail(&self, book_key: &str) -> Option<WorkDetail> {
        let url = format!(
            "{}/{}.json",
            self.base_url,
            book_key.trim_start_matches('/')
        );

        match self.fetcher.get(&url).await {
            Ok(body) => self.normalizer.parse_detail(&body),
            Err(e) => {
                debug!(book_key, error = %e, "detail fetch failed");
                None
            }
        }
    }

    fn search_url(&self, query: &str, kind: SearchKind) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search.json", self.base_url))?;
        url.query_pairs_mut()
            .append_pair(kind.query_param(), query)
            .append_pair("limit", &self.limit.to_string());
        Ok(url)
    }

    fn lock_results(&self) -> MutexGuard<'_, Vec<Book>> {
        self.results.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Keeps the pending counter accurate on every exit path.
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub mod http_fetcher;

pub use http_fetcher::HttpFetcher;

use async_trait::async_trait;

use crate::app::Result;

/// Transport seam for the query dispatcher.
///
/// The only suspension point in the crate; tests substitute canned or gated
/// implementations.
#[async_trait]
pub trait Fetcher {
    /// GET `url` and return the response body. Non-success statuses are errors.
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

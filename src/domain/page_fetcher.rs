use async_trait::async_trait;

use super::errors::FetchError;
use super::search::SearchRequest;

/// Transport port: turns a request descriptor into the page markup
///
/// Retries, cookies and connection reuse are the implementation's business; the
/// search core performs exactly one `fetch` per page it wants.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &SearchRequest) -> Result<String, FetchError>;
}

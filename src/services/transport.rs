use async_trait::async_trait;

use crate::error::AppResult;

/// Outbound capabilities the submission client needs from its environment.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` as `text/plain` and returns the response text.
    async fn post(&self, body: String) -> AppResult<String>;

    /// Writes the same request over a short-lived raw connection without
    /// reading any response.
    async fn post_detached(&self, body: String) -> AppResult<()>;
}

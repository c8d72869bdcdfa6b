//! Port for fetching a single candidate image URL.

use async_trait::async_trait;

use crate::domain::errors::FetchError;

/// Resolves once the image at `url` is available for display, or rejects.
///
/// Dropping the returned future must be safe at any point; the loader drops
/// it when the attempt timeout fires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcherPort: Send + Sync {
    /// Fetches `url` and reports whether it produced an image.
    async fn fetch(&self, url: &str) -> Result<(), FetchError>;
}

mod image_cache_port;
mod image_fetcher_port;
mod visibility_port;

pub use image_cache_port::ImageCachePort;
pub use image_fetcher_port::ImageFetcherPort;
pub use visibility_port::{ObserveOptions, VisibilityEvent, VisibilityNotifierPort};

#[cfg(test)]
pub mod mocks {
    pub use super::image_fetcher_port::MockImageFetcherPort;
    pub use super::image_fetcher_port::mock::{Behavior, ScriptedFetcher};
    pub use super::visibility_port::mock::MockVisibilityNotifier;
}

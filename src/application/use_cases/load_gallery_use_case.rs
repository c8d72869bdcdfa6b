//! Loads a full gallery page at once.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::info;

use crate::application::dto::{GalleryEntry, GalleryReport};
use crate::application::services::{ImageHandle, ImageLoader};
use crate::domain::entities::ImageRequest;

/// Loads every image of a page concurrently and reports the result.
#[derive(Clone)]
pub struct LoadGalleryUseCase {
    loader: Arc<ImageLoader>,
}

impl LoadGalleryUseCase {
    /// Creates new gallery use case.
    #[must_use]
    pub const fn new(loader: Arc<ImageLoader>) -> Self {
        Self { loader }
    }

    /// Loads all `requests`, interleaved, and waits for every one to settle.
    pub async fn execute(&self, requests: Vec<ImageRequest>) -> GalleryReport {
        let metrics = self.loader.metrics();
        metrics.expect_more(requests.len() as u64);

        let handles: Vec<Arc<ImageHandle>> = requests
            .into_iter()
            .map(|request| self.loader.track(request))
            .collect();

        join_all(handles.iter().map(|handle| self.loader.load(handle))).await;

        let entries: Vec<GalleryEntry> = handles
            .iter()
            .map(|handle| GalleryEntry {
                canonical: handle.request().src.clone(),
                state: handle.state(),
                attributes: handle.display_attributes(),
                error: handle.error().map(|e| e.to_string()),
            })
            .collect();

        let report = GalleryReport {
            entries,
            progress: metrics.progress(),
            metrics: metrics.snapshot(),
        };

        info!(
            loaded = report.loaded_count(),
            failed = report.failed_count(),
            progress = report.progress,
            "Gallery load finished"
        );

        report
    }
}

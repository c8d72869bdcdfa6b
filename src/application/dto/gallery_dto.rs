//! Gallery load report DTOs.

use serde::Serialize;

use crate::application::services::GalleryMetrics;
use crate::domain::entities::{DisplayAttributes, LoadState};

/// Result of loading one gallery image.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryEntry {
    /// Canonical source.
    pub canonical: String,
    /// Final load state.
    pub state: LoadState,
    /// Attributes to render.
    pub attributes: DisplayAttributes,
    /// Aggregate error message, if every variant failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of loading a whole gallery page.
#[derive(Debug, Clone, Serialize)]
pub struct GalleryReport {
    /// One entry per requested image, in request order.
    pub entries: Vec<GalleryEntry>,
    /// Loaded percentage of expected images.
    pub progress: u32,
    /// Metrics snapshot taken after the loads settled.
    pub metrics: GalleryMetrics,
}

impl GalleryReport {
    /// Number of entries that loaded.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state.is_loaded())
            .count()
    }

    /// Number of entries that fell back to the original.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state.is_errored())
            .count()
    }
}

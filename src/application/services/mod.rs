pub mod image_loader;
pub mod metrics_collector;
pub mod visibility_scheduler;

pub use image_loader::{
    DEFAULT_ATTEMPT_TIMEOUT, ImageHandle, ImageLoadedEvent, ImageLoader, ImageLoaderConfig,
    LoadOutcome, LoadSource,
};
pub use metrics_collector::{GalleryMetrics, MetricsCollector, PerformanceSignal};
pub use visibility_scheduler::{VisibilityScheduler, VisibilitySubscription};

//! Application layer with the loading engine, scheduling and use cases.

/// Data transfer objects.
pub mod dto;
/// Loader, scheduler and metrics services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{GalleryEntry, GalleryReport};
pub use services::{
    ImageHandle, ImageLoader, ImageLoaderConfig, LoadOutcome, MetricsCollector,
    VisibilityScheduler, VisibilitySubscription,
};
pub use use_cases::LoadGalleryUseCase;

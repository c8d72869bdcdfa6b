//! Domain layer with core entities, errors, port definitions and pure services.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure domain services.
pub mod services;

pub use entities::{ImageRequest, LoadState, SlotId, VariantCandidateList};
pub use errors::{FetchError, LoadError};
pub use ports::{ImageCachePort, ImageFetcherPort, VisibilityNotifierPort};
pub use services::FormatResolver;

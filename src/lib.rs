//! Gallery Loader - client-side image delivery for photo galleries.
//!
//! This crate decides when to fetch each gallery image, which encoded
//! variant to request, tracks load completion, and avoids redundant
//! fetches with a bounded LRU cache shared by every loader.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the loader, scheduler, metrics and use cases.
pub mod application;
/// Domain layer containing entities, errors, ports and pure services.
pub mod domain;
/// Infrastructure layer containing the cache, HTTP fetcher and configuration.
pub mod infrastructure;

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = "gallery-loader";

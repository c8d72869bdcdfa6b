//! Image loading engine.
//!
//! Resolves a canonical path into candidate variants and tries them in
//! order, each raced against a timeout. The cache short-circuits paths that
//! already loaded once.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::domain::entities::{
    DisplayAttributes, ImageFormat, ImageRequest, LoadState, LoadingHint, SlotId,
    aspect_ratio_style,
};
use crate::domain::errors::LoadError;
use crate::domain::ports::{ImageCachePort, ImageFetcherPort};
use crate::domain::services::{DEFAULT_FORMATS, FormatResolver};

use super::metrics_collector::MetricsCollector;

/// Default per-candidate timeout.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(8);

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Timeout for each candidate attempt.
    pub attempt_timeout: Duration,
    /// Modern formats tried before the original, in order.
    pub formats: Vec<ImageFormat>,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            formats: DEFAULT_FORMATS.to_vec(),
        }
    }
}

/// Where a loaded source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Resolved by an earlier load; no network access.
    Cache,
    /// Fetched as the given variant.
    Network(ImageFormat),
}

impl std::fmt::Display for LoadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Network(format) => write!(f, "network ({format})"),
        }
    }
}

/// Settled result of one `load` call. Loading never returns `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A variant resolved and is now displayed.
    Loaded {
        /// Displayed source.
        src: String,
        /// Where it came from.
        source: LoadSource,
    },
    /// Every variant failed; the original path is displayed instead.
    Failed {
        /// Displayed fallback source.
        fallback_src: String,
        /// Aggregate error.
        error: LoadError,
    },
    /// Nothing to do: the handle is already loading, loaded, errored or torn down.
    Skipped {
        /// State the handle was in.
        state: LoadState,
    },
    /// The load finished after the owning view was torn down; result ignored.
    Discarded,
}

impl LoadOutcome {
    /// Returns true for `Loaded`.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Message sent when an image finishes loading.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// Slot the image belongs to.
    pub slot: SlotId,
    /// Canonical source.
    pub src: String,
    /// `Loaded` or `Failed`.
    pub outcome: LoadOutcome,
}

/// Result of racing one candidate against the timeout.
enum AttemptOutcome {
    Success(String),
    Failure(LoadError),
}

#[derive(Debug)]
struct HandleState {
    state: LoadState,
    current_src: String,
    error: Option<LoadError>,
    torn_down: bool,
}

/// Per-request load state, owned by one image slot.
#[derive(Debug)]
pub struct ImageHandle {
    slot: SlotId,
    request: ImageRequest,
    inner: Mutex<HandleState>,
}

impl ImageHandle {
    /// Creates an idle handle showing the request's placeholder.
    #[must_use]
    pub fn new(slot: SlotId, request: ImageRequest) -> Self {
        let current_src = request.placeholder.clone().unwrap_or_default();
        Self {
            slot,
            request,
            inner: Mutex::new(HandleState {
                state: LoadState::Idle,
                current_src,
                error: None,
                torn_down: false,
            }),
        }
    }

    /// Slot this handle renders into.
    #[must_use]
    pub const fn slot(&self) -> &SlotId {
        &self.slot
    }

    /// The immutable request.
    #[must_use]
    pub const fn request(&self) -> &ImageRequest {
        &self.request
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.inner.lock().state
    }

    /// Source currently displayed.
    #[must_use]
    pub fn current_src(&self) -> String {
        self.inner.lock().current_src.clone()
    }

    /// Aggregate error of the last failed load.
    #[must_use]
    pub fn error(&self) -> Option<LoadError> {
        self.inner.lock().error.clone()
    }

    /// Marks the owning view as gone. In-flight results are ignored afterwards.
    pub fn tear_down(&self) {
        self.inner.lock().torn_down = true;
    }

    /// Returns true once the owning view is gone.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.inner.lock().torn_down
    }

    /// Attributes for the renderer.
    #[must_use]
    pub fn display_attributes(&self) -> DisplayAttributes {
        DisplayAttributes {
            src: self.current_src(),
            alt: self.request.alt.clone().unwrap_or_default(),
            loading: if self.request.lazy {
                LoadingHint::Lazy
            } else {
                LoadingHint::Eager
            },
            decoding: "async",
            style: self.request.aspect_ratio.map(aspect_ratio_style),
            sizes: self.request.sizes.clone(),
        }
    }

    /// Moves `Idle -> Loading`; otherwise returns the blocking state.
    fn begin(&self) -> Result<(), LoadState> {
        let mut inner = self.inner.lock();
        if inner.torn_down || !inner.state.can_start() {
            return Err(inner.state);
        }
        inner.state = LoadState::Loading;
        inner.error = None;
        Ok(())
    }

    /// Resets `Loaded | Errored` to `Idle`. Fails while loading.
    fn reset(&self) -> Result<(), LoadState> {
        let mut inner = self.inner.lock();
        if inner.torn_down || inner.state.is_loading() {
            return Err(inner.state);
        }
        inner.state = LoadState::Idle;
        inner.error = None;
        Ok(())
    }

    /// Returns false if the view was torn down and nothing changed.
    fn finish_loaded(&self, src: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.torn_down {
            return false;
        }
        inner.state = LoadState::Loaded;
        inner.current_src = src.to_string();
        true
    }

    fn finish_errored(&self, error: &LoadError) -> bool {
        let mut inner = self.inner.lock();
        if inner.torn_down {
            return false;
        }
        inner.state = LoadState::Errored;
        inner.current_src.clone_from(&self.request.src);
        inner.error = Some(error.clone());
        true
    }
}

/// Orchestrates candidate fetches, the shared cache and completion reporting.
pub struct ImageLoader {
    cache: Arc<dyn ImageCachePort>,
    fetcher: Arc<dyn ImageFetcherPort>,
    metrics: Arc<MetricsCollector>,
    resolver: FormatResolver,
    event_tx: Option<mpsc::UnboundedSender<ImageLoadedEvent>>,
    config: ImageLoaderConfig,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a loader sharing `cache` and `metrics` with other loaders.
    #[must_use]
    pub fn new(
        config: ImageLoaderConfig,
        cache: Arc<dyn ImageCachePort>,
        fetcher: Arc<dyn ImageFetcherPort>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        let resolver = FormatResolver::new(config.formats.iter().copied());
        Self {
            cache,
            fetcher,
            metrics,
            resolver,
            event_tx: None,
            config,
        }
    }

    /// Publishes completion events on `event_tx`.
    #[must_use]
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<ImageLoadedEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Creates a handle for `request` in a freshly generated slot.
    #[must_use]
    pub fn track(&self, request: ImageRequest) -> Arc<ImageHandle> {
        Arc::new(ImageHandle::new(SlotId::generate(), request))
    }

    /// Shared cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn ImageCachePort> {
        &self.cache
    }

    /// Shared metrics collector.
    #[must_use]
    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// Loader configuration.
    #[must_use]
    pub const fn config(&self) -> &ImageLoaderConfig {
        &self.config
    }

    /// Loads the image for `handle`.
    ///
    /// A no-op unless the handle is idle, so concurrent calls produce one
    /// fetch sequence. Worst case latency is the attempt timeout times the
    /// number of candidates.
    pub async fn load(&self, handle: &ImageHandle) -> LoadOutcome {
        if let Err(state) = handle.begin() {
            trace!(slot = %handle.slot(), state = %state, "Load skipped");
            return LoadOutcome::Skipped { state };
        }

        let src = handle.request().src.as_str();

        if let Some(cached) = self.cache.get(src) {
            debug!(slot = %handle.slot(), src = %src, resolved = %cached, "Serving cached source");
            return self.settle_loaded(handle, cached, LoadSource::Cache);
        }

        let candidates = self.resolver.resolve(src);
        for variant in &candidates {
            if handle.is_torn_down() {
                debug!(slot = %handle.slot(), "View torn down, abandoning remaining candidates");
                return LoadOutcome::Discarded;
            }
            match self.attempt(&variant.url).await {
                AttemptOutcome::Success(url) => {
                    self.cache.set(src.to_string(), url.clone());
                    return self.settle_loaded(handle, url, LoadSource::Network(variant.format));
                }
                AttemptOutcome::Failure(e) => {
                    debug!(slot = %handle.slot(), error = %e, "Candidate failed, trying next");
                }
            }
        }

        self.settle_failed(handle, LoadError::all_failed(src, candidates.len()))
    }

    /// Resets a loaded or errored handle to idle and loads it again.
    pub async fn reload(&self, handle: &ImageHandle) -> LoadOutcome {
        if let Err(state) = handle.reset() {
            trace!(slot = %handle.slot(), state = %state, "Reload skipped");
            return LoadOutcome::Skipped { state };
        }
        self.load(handle).await
    }

    /// Races one candidate fetch against the attempt timeout.
    ///
    /// The timer lives inside the `timeout` future and is dropped on return.
    async fn attempt(&self, url: &str) -> AttemptOutcome {
        let limit = self.config.attempt_timeout;
        let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        trace!(url = %url, timeout_ms = limit_ms, "Attempting candidate");

        match tokio::time::timeout(limit, self.fetcher.fetch(url)).await {
            Ok(Ok(())) => AttemptOutcome::Success(url.to_string()),
            Ok(Err(reason)) => AttemptOutcome::Failure(LoadError::unavailable(url, reason)),
            Err(_) => AttemptOutcome::Failure(LoadError::timeout(url, limit_ms)),
        }
    }

    fn settle_loaded(&self, handle: &ImageHandle, src: String, source: LoadSource) -> LoadOutcome {
        if !handle.finish_loaded(&src) {
            debug!(slot = %handle.slot(), "View torn down, ignoring loaded image");
            return LoadOutcome::Discarded;
        }

        self.metrics.record_completion();
        debug!(slot = %handle.slot(), src = %src, source = %source, "Image loaded");

        let outcome = LoadOutcome::Loaded { src, source };
        self.emit(handle, &outcome);
        outcome
    }

    fn settle_failed(&self, handle: &ImageHandle, error: LoadError) -> LoadOutcome {
        if !handle.finish_errored(&error) {
            debug!(slot = %handle.slot(), "View torn down, ignoring failed load");
            return LoadOutcome::Discarded;
        }

        warn!(slot = %handle.slot(), error = %error, "Image load failed, showing original");

        let outcome = LoadOutcome::Failed {
            fallback_src: handle.request().src.clone(),
            error,
        };
        self.emit(handle, &outcome);
        outcome
    }

    fn emit(&self, handle: &ImageHandle, outcome: &LoadOutcome) {
        if let Some(tx) = &self.event_tx {
            let event = ImageLoadedEvent {
                slot: handle.slot().clone(),
                src: handle.request().src.clone(),
                outcome: outcome.clone(),
            };
            if tx.send(event).is_err() {
                trace!("Load event receiver dropped");
            }
        }
    }
}

//! Decides when each image slot starts loading.
//!
//! Eager and priority requests load as soon as they are attached. Lazy
//! requests wait for the first visibility crossing, load once, and stop
//! listening.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::domain::entities::{ImageRequest, SlotId};
use crate::domain::ports::{ObserveOptions, VisibilityNotifierPort};

use super::image_loader::{ImageHandle, ImageLoader};

/// Schedules loads for attached slots.
pub struct VisibilityScheduler {
    loader: Arc<ImageLoader>,
    notifier: Arc<dyn VisibilityNotifierPort>,
    options: ObserveOptions,
}

impl std::fmt::Debug for VisibilityScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityScheduler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl VisibilityScheduler {
    /// Creates a scheduler feeding `loader`.
    #[must_use]
    pub fn new(
        loader: Arc<ImageLoader>,
        notifier: Arc<dyn VisibilityNotifierPort>,
        options: ObserveOptions,
    ) -> Self {
        Self {
            loader,
            notifier,
            options,
        }
    }

    /// Creates a handle for `request` in `slot` and attaches it.
    pub fn attach_request(
        &self,
        slot: SlotId,
        request: ImageRequest,
    ) -> (Arc<ImageHandle>, VisibilitySubscription) {
        let handle = Arc::new(ImageHandle::new(slot, request));
        let subscription = self.attach(Arc::clone(&handle));
        (handle, subscription)
    }

    /// Starts loading now, or once the slot becomes visible for lazy requests.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn attach(&self, handle: Arc<ImageHandle>) -> VisibilitySubscription {
        let slot = handle.slot().clone();

        if handle.request().loads_immediately() {
            debug!(slot = %slot, priority = handle.request().priority, "Loading immediately");
            spawn_load(Arc::clone(&self.loader), handle);
            return VisibilitySubscription::fired(slot);
        }

        let mut events = self.notifier.observe(&slot, self.options);
        let triggered = Arc::new(AtomicBool::new(false));
        let threshold = self.options.threshold;

        let task = tokio::spawn({
            let loader = Arc::clone(&self.loader);
            let notifier = Arc::clone(&self.notifier);
            let triggered = Arc::clone(&triggered);
            async move {
                while let Some(event) = events.recv().await {
                    if !event.crosses(threshold) {
                        trace!(slot = %handle.slot(), ratio = event.intersection_ratio, "Not visible yet");
                        continue;
                    }
                    if triggered.swap(true, Ordering::SeqCst) {
                        break;
                    }
                    notifier.unobserve(handle.slot());
                    debug!(slot = %handle.slot(), "Slot visible, loading");
                    spawn_load(loader, handle);
                    break;
                }
            }
        });

        trace!(slot = %slot, margin_px = self.options.root_margin_px, "Observing slot");

        VisibilitySubscription {
            slot,
            notifier: Some(Arc::clone(&self.notifier)),
            task: Mutex::new(Some(task)),
            triggered,
            detached: AtomicBool::new(false),
        }
    }
}

/// Loads run in their own task so detaching never aborts a fetch.
fn spawn_load(loader: Arc<ImageLoader>, handle: Arc<ImageHandle>) {
    tokio::spawn(async move {
        loader.load(&handle).await;
    });
}

/// Binds one slot to its pending visibility trigger.
///
/// Dropping the subscription detaches it.
pub struct VisibilitySubscription {
    slot: SlotId,
    notifier: Option<Arc<dyn VisibilityNotifierPort>>,
    task: Mutex<Option<JoinHandle<()>>>,
    triggered: Arc<AtomicBool>,
    detached: AtomicBool,
}

impl VisibilitySubscription {
    /// A subscription whose load was started at attach time.
    fn fired(slot: SlotId) -> Self {
        Self {
            slot,
            notifier: None,
            task: Mutex::new(None),
            triggered: Arc::new(AtomicBool::new(true)),
            detached: AtomicBool::new(false),
        }
    }

    /// Observed slot.
    #[must_use]
    pub const fn slot(&self) -> &SlotId {
        &self.slot
    }

    /// Returns true once the load has been started.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Returns true while still waiting for visibility.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.is_triggered() && !self.detached.load(Ordering::SeqCst)
    }

    /// Stops observing the slot. Idempotent; safe before or after triggering.
    pub fn detach(&self) {
        if self.detached.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
        if let Some(notifier) = &self.notifier {
            notifier.unobserve(&self.slot);
        }
        trace!(slot = %self.slot, "Subscription detached");
    }
}

impl Drop for VisibilitySubscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for VisibilitySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilitySubscription")
            .field("slot", &self.slot)
            .field("triggered", &self.is_triggered())
            .field("detached", &self.detached.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

//! Port for viewport visibility notifications.

use tokio::sync::mpsc;

use crate::domain::entities::SlotId;

/// Options for observing one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Margin added around the viewport so loading starts early.
    pub root_margin_px: u32,
    /// Minimum visible fraction of the slot that counts as visible.
    pub threshold: f32,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            root_margin_px: 200,
            threshold: 0.1,
        }
    }
}

/// One visibility change reported for an observed slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEvent {
    /// Visible fraction of the slot inside the (margin-expanded) viewport.
    pub intersection_ratio: f32,
    /// Whether the slot intersects the viewport at all.
    pub is_intersecting: bool,
}

impl VisibilityEvent {
    /// Event for a slot entering the viewport with the given ratio.
    #[must_use]
    pub const fn entered(intersection_ratio: f32) -> Self {
        Self {
            intersection_ratio,
            is_intersecting: true,
        }
    }

    /// Event for a slot leaving the viewport.
    #[must_use]
    pub const fn exited() -> Self {
        Self {
            intersection_ratio: 0.0,
            is_intersecting: false,
        }
    }

    /// Returns true if this event crosses `threshold`.
    #[must_use]
    pub fn crosses(&self, threshold: f32) -> bool {
        self.is_intersecting && self.intersection_ratio >= threshold
    }
}

/// Reports enter/exit events for registered slots.
pub trait VisibilityNotifierPort: Send + Sync {
    /// Starts observing `slot`; events arrive on the returned receiver.
    fn observe(&self, slot: &SlotId, options: ObserveOptions)
    -> mpsc::UnboundedReceiver<VisibilityEvent>;

    /// Stops observing `slot`. Must tolerate slots that are not observed.
    fn unobserve(&self, slot: &SlotId);
}

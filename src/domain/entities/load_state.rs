//! Load state machine for one image request.

use serde::Serialize;

/// Where an image request is in its loading lifecycle.
///
/// `Idle -> Loading -> Loaded | Errored`. `Errored` only leaves via an
/// explicit reload, which resets to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// No fetch scheduled yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// A candidate variant resolved.
    Loaded,
    /// Every candidate failed.
    Errored,
}

impl LoadState {
    /// Returns true if the image is ready for display.
    #[must_use]
    pub const fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Returns true if a fetch is in flight.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if loading failed.
    #[must_use]
    pub const fn is_errored(self) -> bool {
        matches!(self, Self::Errored)
    }

    /// Returns true if a new load may start from this state.
    /// `Errored` is terminal until a reload resets it.
    #[must_use]
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Loaded => write!(f, "loaded"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

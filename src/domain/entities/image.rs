//! Domain types describing a single gallery image request.

use serde::{Deserialize, Serialize};

/// Identifier of one rendered image slot (the element that displays an image).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub String);

impl SlotId {
    /// Creates a new `SlotId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a random, unique `SlotId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Target quality tier requested by the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Smallest payload.
    Low,
    /// Balanced payload.
    #[default]
    Medium,
    /// Full quality.
    High,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// External input describing one image to display.
///
/// Built once by the page and never mutated afterwards; the loader only
/// ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Canonical (un-optimized) image path.
    pub src: String,
    /// Source shown until the real image resolves.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Alternative text.
    #[serde(default)]
    pub alt: Option<String>,
    /// Responsive `sizes` hint passed through to the renderer.
    #[serde(default)]
    pub sizes: Option<String>,
    /// Defer loading until the slot approaches the viewport.
    #[serde(default)]
    pub lazy: bool,
    /// Load immediately regardless of `lazy`.
    #[serde(default)]
    pub priority: bool,
    /// Target quality tier.
    #[serde(default)]
    pub quality: Quality,
    /// Width / height ratio used to reserve layout space.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

impl ImageRequest {
    /// Creates an eager, non-priority request for `src`.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            placeholder: None,
            alt: None,
            sizes: None,
            lazy: false,
            priority: false,
            quality: Quality::default(),
            aspect_ratio: None,
        }
    }

    /// Marks the request as lazy.
    #[must_use]
    pub const fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Marks the request as priority.
    #[must_use]
    pub const fn priority(mut self) -> Self {
        self.priority = true;
        self
    }

    /// Sets the placeholder source.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the alt text.
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Sets the responsive sizes hint.
    #[must_use]
    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    /// Sets the quality tier.
    #[must_use]
    pub const fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the aspect ratio.
    #[must_use]
    pub const fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Returns true if loading should start without waiting for visibility.
    #[must_use]
    pub const fn loads_immediately(&self) -> bool {
        !self.lazy || self.priority
    }
}

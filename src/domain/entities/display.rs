//! Flat attribute record handed to the renderer.

use serde::Serialize;

/// Browser loading hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingHint {
    /// Let the renderer defer offscreen images.
    Lazy,
    /// Load right away.
    Eager,
}

/// Resolved display attributes for one image slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayAttributes {
    /// Source to display right now.
    pub src: String,
    /// Alternative text, empty when none was supplied.
    pub alt: String,
    /// Loading hint.
    pub loading: LoadingHint,
    /// Decoding hint, always `async`.
    pub decoding: &'static str,
    /// Inline style reserving layout space.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Responsive sizes hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
}

/// Formats the inline style for an aspect ratio.
#[must_use]
pub fn aspect_ratio_style(ratio: f64) -> String {
    format!("aspect-ratio: {ratio}")
}

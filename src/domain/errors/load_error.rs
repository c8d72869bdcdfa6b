//! Image loading error types.

use thiserror::Error;

/// Why a single fetch attempt did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("request failed: {message}")]
    Network { message: String },

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("response is not an image: {message}")]
    NotAnImage { message: String },

    #[error("fetch rejected: {message}")]
    Rejected { message: String },
}

impl FetchError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates not-an-image error.
    #[must_use]
    pub fn not_an_image(message: impl Into<String>) -> Self {
        Self::NotAnImage {
            message: message.into(),
        }
    }

    /// Creates rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Image loading error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("variant {url} unavailable: {reason}")]
    VariantUnavailable { url: String, reason: FetchError },

    #[error("variant {url} timed out after {after_ms}ms")]
    Timeout { url: String, after_ms: u64 },

    #[error("all {attempts} variants of {src} failed to load")]
    AllVariantsFailed { src: String, attempts: usize },
}

impl LoadError {
    /// Creates variant unavailable error.
    #[must_use]
    pub fn unavailable(url: impl Into<String>, reason: FetchError) -> Self {
        Self::VariantUnavailable {
            url: url.into(),
            reason,
        }
    }

    /// Creates timeout error.
    #[must_use]
    pub fn timeout(url: impl Into<String>, after_ms: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            after_ms,
        }
    }

    /// Creates the aggregate failure.
    #[must_use]
    pub fn all_failed(src: impl Into<String>, attempts: usize) -> Self {
        Self::AllVariantsFailed {
            src: src.into(),
            attempts,
        }
    }

    /// Returns whether the loader moves on to the next candidate.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::VariantUnavailable { .. } | Self::Timeout { .. }
        )
    }

    /// Returns whether the attempt ran out of time.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_errors_are_recoverable() {
        assert!(LoadError::timeout("/a.avif", 8000).is_recoverable());
        assert!(
            LoadError::unavailable("/a.webp", FetchError::Status { status: 404 }).is_recoverable()
        );
        assert!(!LoadError::all_failed("/a.jpg", 3).is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            LoadError::all_failed("/a.jpg", 3).to_string(),
            "all 3 variants of /a.jpg failed to load"
        );
        assert_eq!(
            LoadError::unavailable("/a.webp", FetchError::Status { status: 404 }).to_string(),
            "variant /a.webp unavailable: HTTP 404"
        );
    }
}

//! Candidate encodings of one logical image.

use serde::Serialize;

/// Encoding of a candidate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// AVIF, next-generation and most compressed.
    Avif,
    /// WebP, widely supported modern format.
    Webp,
    /// Whatever the canonical path already points to.
    Original,
}

impl ImageFormat {
    /// File extension written by the asset pipeline, if the format has a fixed one.
    #[must_use]
    pub const fn extension(self) -> Option<&'static str> {
        match self {
            Self::Avif => Some("avif"),
            Self::Webp => Some("webp"),
            Self::Original => None,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Avif => write!(f, "avif"),
            Self::Webp => write!(f, "webp"),
            Self::Original => write!(f, "original"),
        }
    }
}

/// One concrete URL to try.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Encoding this URL is expected to hold.
    pub format: ImageFormat,
    /// Path or URL to fetch.
    pub url: String,
}

/// Ordered candidates for one canonical path, modern formats first.
///
/// The last entry is always the canonical path itself so a fallback exists
/// even when the asset pipeline produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantCandidateList {
    canonical: String,
    variants: Vec<Variant>,
}

impl VariantCandidateList {
    /// Builds a list from modern variants; the original is appended last.
    #[must_use]
    pub fn new(canonical: impl Into<String>, modern: Vec<Variant>) -> Self {
        let canonical = canonical.into();
        let mut variants = modern;
        variants.retain(|v| v.format != ImageFormat::Original);
        variants.push(Variant {
            format: ImageFormat::Original,
            url: canonical.clone(),
        });
        Self {
            canonical,
            variants,
        }
    }

    /// Candidates in the order they should be attempted.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Candidate URLs in attempt order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.url.as_str())
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Always false: the original is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// The canonical path, which is also the guaranteed fallback candidate.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.canonical
    }
}

impl<'a> IntoIterator for &'a VariantCandidateList {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_always_last() {
        let list = VariantCandidateList::new(
            "/a/photo.jpg",
            vec![Variant {
                format: ImageFormat::Webp,
                url: "/a/photo.webp".to_string(),
            }],
        );

        assert_eq!(list.len(), 2);
        assert_eq!(list.variants()[1].format, ImageFormat::Original);
        assert_eq!(list.urls().last(), Some("/a/photo.jpg"));
    }

    #[test]
    fn test_empty_modern_list_still_has_fallback() {
        let list = VariantCandidateList::new("photo", Vec::new());
        assert!(!list.is_empty());
        assert_eq!(list.original(), "photo");
    }
}

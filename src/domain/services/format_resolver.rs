//! Derives modern-format candidate paths from a canonical image path.
//!
//! The build pipeline writes `<dir>/<name>.avif` and `<dir>/<name>.webp`
//! next to every source image. Nothing here checks that they exist; a
//! missing variant is discovered by trying to load it.

use crate::domain::entities::{ImageFormat, Variant, VariantCandidateList};

/// Formats tried before the original, most compressed first.
pub const DEFAULT_FORMATS: [ImageFormat; 2] = [ImageFormat::Avif, ImageFormat::Webp];

/// Resolves canonical paths into ordered candidate lists.
#[derive(Debug, Clone)]
pub struct FormatResolver {
    formats: Vec<ImageFormat>,
}

impl FormatResolver {
    /// Creates a resolver trying `formats` in order before the original.
    #[must_use]
    pub fn new(formats: impl IntoIterator<Item = ImageFormat>) -> Self {
        Self {
            formats: formats
                .into_iter()
                .filter(|f| f.extension().is_some())
                .collect(),
        }
    }

    /// Produces the candidate list for `canonical`. Never fails.
    #[must_use]
    pub fn resolve(&self, canonical: &str) -> VariantCandidateList {
        let Some(parts) = PathParts::parse(canonical) else {
            return VariantCandidateList::new(canonical, Vec::new());
        };

        let modern = self
            .formats
            .iter()
            .filter_map(|&format| {
                let ext = format.extension()?;
                Some(Variant {
                    format,
                    url: parts.with_extension(ext),
                })
            })
            .filter(|v| v.url != canonical)
            .collect();

        VariantCandidateList::new(canonical, modern)
    }
}

impl Default for FormatResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FORMATS)
    }
}

/// A canonical path split into directory, stem and trailing query.
#[derive(Debug, PartialEq, Eq)]
struct PathParts<'a> {
    /// Everything up to and including the last `/`, possibly empty.
    dir: &'a str,
    stem: &'a str,
    /// `?query` and/or `#fragment`, kept verbatim.
    suffix: &'a str,
}

impl<'a> PathParts<'a> {
    /// Returns None when there is no file name to rewrite.
    fn parse(path: &'a str) -> Option<Self> {
        let split_at = path.find(['?', '#']).unwrap_or(path.len());
        let (location, suffix) = path.split_at(split_at);

        let (dir, file) = match location.rfind('/') {
            Some(idx) => location.split_at(idx + 1),
            None => ("", location),
        };

        // A leading dot names a hidden file, not an extension.
        let stem = match file.rfind('.') {
            Some(idx) if idx > 0 => &file[..idx],
            _ => file,
        };

        if stem.is_empty() {
            return None;
        }

        Some(Self { dir, stem, suffix })
    }

    fn with_extension(&self, ext: &str) -> String {
        format!("{}{}.{}{}", self.dir, self.stem, ext, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_resolve_orders_modern_formats_first() {
        let list = FormatResolver::default().resolve("/a/b/photo.jpg");
        let urls: Vec<_> = list.urls().collect();

        assert_eq!(urls, vec!["/a/b/photo.avif", "/a/b/photo.webp", "/a/b/photo.jpg"]);
    }

    #[test]
    fn test_resolve_without_extension() {
        let list = FormatResolver::default().resolve("/a/b/noext");
        let urls: Vec<_> = list.urls().collect();

        assert_eq!(urls, vec!["/a/b/noext.avif", "/a/b/noext.webp", "/a/b/noext"]);
    }

    #[test_case("photo.jpg", &["photo.avif", "photo.webp", "photo.jpg"] ; "no_directory")]
    #[test_case("/photo.png", &["/photo.avif", "/photo.webp", "/photo.png"] ; "root_directory")]
    #[test_case("/a/photo.final.jpg", &["/a/photo.final.avif", "/a/photo.final.webp", "/a/photo.final.jpg"] ; "dotted_name")]
    #[test_case("https://cdn.example.com/p/x.jpg?v=2", &["https://cdn.example.com/p/x.avif?v=2", "https://cdn.example.com/p/x.webp?v=2", "https://cdn.example.com/p/x.jpg?v=2"] ; "query_preserved")]
    #[test_case("/a/.hidden", &["/a/.hidden.avif", "/a/.hidden.webp", "/a/.hidden"] ; "hidden_file")]
    #[test_case("/albums/", &["/albums/"] ; "trailing_slash")]
    #[test_case("", &[""] ; "empty")]
    fn test_resolve_edge_cases(input: &str, expected: &[&str]) {
        let list = FormatResolver::default().resolve(input);
        let urls: Vec<_> = list.urls().collect();
        assert_eq!(urls, expected);
    }

    #[test]
    fn test_already_modern_source_is_not_duplicated() {
        let list = FormatResolver::default().resolve("/a/photo.webp");
        let urls: Vec<_> = list.urls().collect();

        assert_eq!(urls, vec!["/a/photo.avif", "/a/photo.webp"]);
        assert_eq!(list.variants()[1].format, ImageFormat::Original);
    }

    #[test]
    fn test_custom_format_order() {
        let resolver = FormatResolver::new([ImageFormat::Webp, ImageFormat::Original]);
        let urls: Vec<_> = resolver.resolve("/a/photo.jpg").urls().map(String::from).collect();

        assert_eq!(urls, vec!["/a/photo.webp", "/a/photo.jpg"]);
    }
}

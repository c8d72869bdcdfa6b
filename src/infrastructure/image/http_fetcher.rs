//! HTTP adapter for the image fetcher port.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::domain::errors::FetchError;
use crate::domain::ports::ImageFetcherPort;

/// Bytes read from a response before sniffing; enough for every format `image` recognises.
pub const SNIFF_LEN: usize = 64;

/// Fetches candidate variants over HTTP.
///
/// A candidate counts as available when the server answers 2xx with a body
/// whose magic bytes identify an image. The body is not decoded.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpImageFetcher {
    /// Creates a fetcher resolving relative paths against `base_url`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: Option<String>, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
        })
    }

    /// Returns the absolute URL for a candidate path.
    #[must_use]
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        match &self.base_url {
            Some(base) if url.starts_with('/') => format!("{base}{url}"),
            Some(base) => format!("{base}/{url}"),
            None => url.to_string(),
        }
    }

    /// Downloads the first [`SNIFF_LEN`] bytes of `url`.
    ///
    /// The rest of the body is dropped with the response.
    async fn download_head(&self, url: &str) -> Result<Bytes, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let mut head = BytesMut::with_capacity(SNIFF_LEN);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::network(format!("Failed to read body: {e}")))?
        {
            if fill_head(&mut head, &chunk) {
                break;
            }
        }

        Ok(head.freeze())
    }
}

#[async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<(), FetchError> {
        let absolute = self.absolute_url(url);
        trace!(url = %absolute, "Fetching candidate");

        let head = self.download_head(&absolute).await?;
        let format = sniff_format(&head)?;

        debug!(url = %absolute, format = ?format, "Candidate is an image");
        Ok(())
    }
}

/// Appends `chunk` to `head` up to [`SNIFF_LEN`] bytes, returning true once full.
fn fill_head(head: &mut BytesMut, chunk: &[u8]) -> bool {
    let take = SNIFF_LEN.saturating_sub(head.len()).min(chunk.len());
    head.extend_from_slice(&chunk[..take]);
    head.len() >= SNIFF_LEN
}

/// Identifies the image format from magic bytes.
///
/// # Errors
/// Returns error if the bytes are not a recognised image format.
pub fn sniff_format(bytes: &[u8]) -> Result<image::ImageFormat, FetchError> {
    if bytes.is_empty() {
        return Err(FetchError::not_an_image("empty body"));
    }
    image::guess_format(bytes).map_err(|e| FetchError::not_an_image(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: Option<&str>) -> HttpImageFetcher {
        HttpImageFetcher::new(base.map(String::from), "gallery-loader-test").unwrap()
    }

    #[test]
    fn test_absolute_url_joins_base() {
        let f = fetcher(Some("https://photos.example.com/"));
        assert_eq!(
            f.absolute_url("/albums/1/a.avif"),
            "https://photos.example.com/albums/1/a.avif"
        );
        assert_eq!(
            f.absolute_url("albums/1/a.avif"),
            "https://photos.example.com/albums/1/a.avif"
        );
    }

    #[test]
    fn test_absolute_url_keeps_full_urls() {
        let f = fetcher(Some("https://photos.example.com"));
        assert_eq!(
            f.absolute_url("https://cdn.example.com/a.webp"),
            "https://cdn.example.com/a.webp"
        );
    }

    #[test]
    fn test_absolute_url_without_base() {
        assert_eq!(fetcher(None).absolute_url("/a.jpg"), "/a.jpg");
    }

    #[test]
    fn test_fill_head_stops_at_sniff_len() {
        let mut head = BytesMut::new();
        assert!(!fill_head(&mut head, &[1; 10]));
        assert!(fill_head(&mut head, &[2; 4096]));
        assert_eq!(head.len(), SNIFF_LEN);
        assert_eq!(head[9], 1);
        assert_eq!(head[10], 2);

        assert!(fill_head(&mut head, &[3; 8]));
        assert_eq!(head.len(), SNIFF_LEN);
    }

    #[test]
    fn test_sniff_png_from_split_chunks() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let mut head = BytesMut::new();
        fill_head(&mut head, &png[..3]);
        fill_head(&mut head, &png[3..]);
        assert_eq!(sniff_format(&head).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn test_sniff_png() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(sniff_format(&png).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn test_sniff_rejects_html() {
        let err = sniff_format(b"<!doctype html><html></html>").unwrap_err();
        assert!(matches!(err, FetchError::NotAnImage { .. }));
    }

    #[test]
    fn test_sniff_rejects_empty() {
        assert!(sniff_format(&[]).is_err());
    }
}

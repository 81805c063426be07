//! Picture download seam.
//!
//! The transport hands us a URL; storing the bytes is the only part of
//! the picture flow that leaves the process, so it sits behind a trait
//! and tests substitute a stub.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Errors while fetching and storing a picture.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level HTTP failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status code: {0}")]
    Status(u16),

    /// Local filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads a picture and stores it under a destination stem.
#[async_trait]
pub trait PictureFetcher: Send + Sync {
    /// Fetch `url` and write the bytes to `dest_stem` plus an inferred
    /// extension, returning the final path.
    async fn fetch(&self, url: &str, dest_stem: &Path) -> Result<PathBuf, FetchError>;
}

/// Production fetcher using reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpPictureFetcher {
    client: reqwest::Client,
}

impl HttpPictureFetcher {
    /// Create a fetcher with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PictureFetcher for HttpPictureFetcher {
    async fn fetch(&self, url: &str, dest_stem: &Path) -> Result<PathBuf, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let extension = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(extension_for)
            .unwrap_or("jpg");

        let bytes = response.bytes().await?;
        let path = dest_stem.with_extension(extension);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        debug!(url, path = %path.display(), "stored picture");
        Ok(path)
    }
}

/// Map a content type to a file extension.
fn extension_for(content_type: &str) -> &'static str {
    // Parameters like "; charset=..." are irrelevant here.
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    match media_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_map_to_extensions() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/gif; charset=binary"), "gif");
        assert_eq!(extension_for("application/octet-stream"), "jpg");
    }
}

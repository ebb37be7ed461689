use async_trait::async_trait;
use bytes::Bytes;

use super::FetchError;

/// Raw response for one image link; the caller decides whether it is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    pub status: u16,
    /// Declared `Content-Type`, if any.
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl FetchedResource {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches linked files with the page's credentials.
#[async_trait(?Send)]
pub trait ImageFetchPort {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError>;
}

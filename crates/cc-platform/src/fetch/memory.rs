use async_trait::async_trait;
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::HashMap;

use cc_core::ports::{FetchError, FetchedResource, ImageFetchPort};

/// Serves canned responses by exact URL; unknown URLs fail with a network
/// error. Every request is recorded in call order.
#[derive(Debug, Default)]
pub struct InMemoryImageFetcher {
    responses: HashMap<String, FetchedResource>,
    requests: RefCell<Vec<String>>,
}

impl InMemoryImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, url: &str, content_type: &str, bytes: impl Into<Bytes>) -> Self {
        self.with_response(
            url,
            FetchedResource {
                status: 200,
                content_type: Some(content_type.to_string()),
                bytes: bytes.into(),
            },
        )
    }

    pub fn with_response(mut self, url: &str, resource: FetchedResource) -> Self {
        self.responses.insert(url.to_string(), resource);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

#[async_trait(?Send)]
impl ImageFetchPort for InMemoryImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Network(format!("no route to {url}")))
    }
}

use async_trait::async_trait;
use bytes::Bytes;
use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{RequestCredentials, RequestInit, Response, Window};

use cc_core::ports::{FetchError, FetchedResource, ImageFetchPort};

use crate::js::describe;

/// `fetch` with the page's cookies (`credentials: "include"`).
#[derive(Clone)]
pub struct WebImageFetcher {
    window: Window,
}

impl WebImageFetcher {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

#[async_trait(?Send)]
impl ImageFetchPort for WebImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_credentials(RequestCredentials::Include);

        let response = JsFuture::from(self.window.fetch_with_str_and_init(url, &init))
            .await
            .map_err(|err| FetchError::Network(describe(&err)))?
            .dyn_into::<Response>()
            .map_err(|_| FetchError::Network("fetch resolved to a non-response".to_string()))?;

        let content_type = response.headers().get("content-type").ok().flatten();
        let buffer = response
            .array_buffer()
            .map_err(|err| FetchError::Body(describe(&err)))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|err| FetchError::Body(describe(&err)))?;

        Ok(FetchedResource {
            status: response.status(),
            content_type,
            bytes: Bytes::from(Uint8Array::new(&buffer).to_vec()),
        })
    }
}

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE, USER_AGENT};
use reqwest::Url;

use cc_core::config::FetchConfig;
use cc_core::ports::{FetchError, FetchedResource, ImageFetchPort};

const DEFAULT_USER_AGENT: &str = concat!("chatcopy/", env!("CARGO_PKG_VERSION"));

/// Fetches image links over HTTP, sending the configured cookie in place of
/// browser credentials.
pub struct HttpImageFetcher {
    client: reqwest::Client,
    base_url: Option<Url>,
    cookie: Option<String>,
}

impl HttpImageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|base| Url::parse(base).map_err(|_| FetchError::InvalidUrl(base.to_string())))
            .transpose()?;

        let client = reqwest::Client::builder()
            .default_headers(Self::default_headers(config)?)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            cookie: config.cookie.clone(),
        })
    }

    fn default_headers(config: &FetchConfig) -> Result<reqwest::header::HeaderMap, FetchError> {
        let agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            USER_AGENT,
            agent
                .parse()
                .map_err(|_| FetchError::Network(format!("invalid user agent `{agent}`")))?,
        );
        Ok(headers)
    }

    /// Absolute links pass through; relative ones need a base.
    fn resolve(&self, link: &str) -> Result<Url, FetchError> {
        let invalid = || FetchError::InvalidUrl(link.to_string());
        match &self.base_url {
            Some(base) => base.join(link).map_err(|_| invalid()),
            None => Url::parse(link).map_err(|_| invalid()),
        }
    }
}

#[async_trait(?Send)]
impl ImageFetchPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
        let url = self.resolve(url)?;

        let mut request = self.client.get(url.clone());
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        tracing::debug!(%url, status, ?content_type, len = bytes.len(), "fetched image link");
        Ok(FetchedResource {
            status,
            content_type,
            bytes,
        })
    }
}

use futures::future::join_all;
use std::collections::HashSet;
use std::rc::Rc;

use cc_core::clipboard::{ExtractionPayload, ImageBlob, MimeType};
use cc_core::config::CopyConfig;
use cc_core::ports::{DomPort, ImageFetchPort};
use cc_core::selectors;
use tracing::{info_span, Instrument};

/// Captures text, cleaned HTML and linked images from a message root.
///
/// Never fails: selectors that do not parse are logged and treated as
/// matching nothing, and each image fetch failure drops only that image.
pub struct ExtractContent<D: DomPort> {
    dom: D,
    fetcher: Rc<dyn ImageFetchPort>,
    content_selectors: Vec<String>,
    chrome_selectors: Vec<String>,
    image_anchor_selectors: Vec<String>,
    marker_attribute: String,
}

impl<D: DomPort> ExtractContent<D> {
    pub fn new(dom: D, fetcher: Rc<dyn ImageFetchPort>, config: &CopyConfig) -> Self {
        Self {
            dom,
            fetcher,
            content_selectors: config.selectors.message_text.clone(),
            chrome_selectors: config.selectors.chrome.clone(),
            image_anchor_selectors: config.selectors.image_anchors.clone(),
            marker_attribute: config.marker_attribute.clone(),
        }
    }

    /// Extracts text, sanitized HTML and linked images from `root`.
    ///
    /// Each part is optional; an image that cannot be fetched is skipped.
    pub async fn execute(&self, root: &D::Element) -> ExtractionPayload {
        let span = info_span!("usecase.extract_content.execute");

        async {
            let text = self.extract_text(root);
            let html = self.extract_html(root);
            let image_blobs = self.collect_images(root).await;

            tracing::debug!(
                has_text = text.is_some(),
                has_html = html.is_some(),
                images = image_blobs.len(),
                "extracted message content"
            );

            ExtractionPayload {
                text,
                html,
                image_blobs,
            }
        }
        .instrument(span)
        .await
    }

    /// First content node with non-blank rendered text, else the root's own text.
    pub fn extract_text(&self, root: &D::Element) -> Option<String> {
        let from_content = self.content_selectors.iter().find_map(|selector| {
            let node = self.query(root, selector)?;
            let text = self.dom.inner_text(&node).trim().to_string();
            if text.is_empty() {
                return None;
            }
            tracing::trace!(%selector, "content selector matched text");
            Some(text)
        });

        from_content.or_else(|| {
            let text = self.dom.inner_text(root).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
    }

    /// Inner markup of the first content node (or the root), taken from a
    /// detached clone with affordances, scripts and host chrome removed.
    pub fn extract_html(&self, root: &D::Element) -> Option<String> {
        let node = self
            .content_selectors
            .iter()
            .find_map(|selector| self.query(root, selector))
            .unwrap_or_else(|| root.clone());

        let clone = match self.dom.clone_deep(&node) {
            Ok(clone) => clone,
            Err(err) => {
                tracing::warn!(error = %err, "failed to clone message content");
                return None;
            }
        };
        self.dom.remove_attribute(&clone, &self.marker_attribute);

        let marked = selectors::has_attribute(&self.marker_attribute);
        let stripped = std::iter::once(marked.as_str())
            .chain(std::iter::once("script"))
            .chain(self.chrome_selectors.iter().map(String::as_str));
        for selector in stripped {
            for element in self.query_all(&clone, selector) {
                self.dom.remove(&element);
            }
        }

        let html = self.dom.inner_html(&clone).trim().to_string();
        (!html.is_empty()).then_some(html)
    }

    /// Distinct thumbnail link targets in document order.
    pub fn image_links(&self, root: &D::Element) -> Vec<String> {
        let mut seen = HashSet::new();
        self.image_anchor_selectors
            .iter()
            .flat_map(|selector| self.query_all(root, selector))
            .filter_map(|anchor| self.dom.link_target(&anchor))
            .filter(|link| seen.insert(link.clone()))
            .collect()
    }

    async fn collect_images(&self, root: &D::Element) -> Vec<ImageBlob> {
        let links = self.image_links(root);
        if links.is_empty() {
            return Vec::new();
        }

        tracing::debug!(count = links.len(), "fetching linked images");
        let fetches = links.iter().map(|link| self.fetch_image(link));
        join_all(fetches).await.into_iter().flatten().collect()
    }

    async fn fetch_image(&self, link: &str) -> Option<ImageBlob> {
        let resource = match self.fetcher.fetch(link).await {
            Ok(resource) => resource,
            Err(err) => {
                tracing::warn!(url = %link, error = %err, "image fetch failed");
                return None;
            }
        };

        if !resource.is_success() {
            tracing::warn!(
                url = %link,
                status = resource.status,
                "image fetch returned error status"
            );
            return None;
        }

        let mime = resource
            .content_type
            .as_deref()
            .and_then(|declared| declared.parse::<MimeType>().ok());
        if let Some(mime) = &mime {
            if !mime.is_image() {
                tracing::debug!(url = %link, %mime, "skipping non-image resource");
                return None;
            }
        }

        Some(ImageBlob::new(resource.bytes, mime))
    }

    fn query(&self, scope: &D::Element, selector: &str) -> Option<D::Element> {
        self.dom
            .query_selector(scope, selector)
            .unwrap_or_else(|err| {
                tracing::warn!(%selector, error = %err, "ignoring unusable selector");
                None
            })
    }

    fn query_all(&self, scope: &D::Element, selector: &str) -> Vec<D::Element> {
        self.dom
            .query_selector_all(scope, selector)
            .unwrap_or_else(|err| {
                tracing::warn!(%selector, error = %err, "ignoring unusable selector");
                Vec::new()
            })
    }
}

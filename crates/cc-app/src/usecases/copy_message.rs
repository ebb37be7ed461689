use cc_core::clipboard::{CopyErrorKind, CopyResult, RichCopyOutcome};
use cc_core::config::CopyConfig;
use cc_core::ports::DomPort;
use tracing::{info_span, Instrument};

use super::{ExtractContent, LegacyFallbackWriter, NegotiateClipboard, ResolveMessageRoot};
use crate::deps::CopyDeps;

/// Copies one message: extract, negotiate the structured clipboard, then
/// fall back to plain text.
pub struct CopyMessage<D: DomPort> {
    resolver: ResolveMessageRoot<D>,
    extractor: ExtractContent<D>,
    negotiator: NegotiateClipboard,
    fallback: LegacyFallbackWriter<D>,
}

impl<D: DomPort + Clone> CopyMessage<D> {
    /// Builds the pipeline stages over one document and set of ports.
    pub fn new(dom: D, deps: CopyDeps, config: &CopyConfig) -> Self {
        Self {
            resolver: ResolveMessageRoot::new(dom.clone(), &config.selectors),
            extractor: ExtractContent::new(dom.clone(), deps.image_fetcher, config),
            negotiator: NegotiateClipboard::new(deps.rich_clipboard),
            fallback: LegacyFallbackWriter::new(dom, deps.text_clipboard),
        }
    }
}

impl<D: DomPort> CopyMessage<D> {
    /// Copies the message rooted at `message_root`. Failures are reported in
    /// the returned [`CopyResult`], never raised.
    pub async fn execute(&self, message_root: &D::Element) -> CopyResult {
        let span = info_span!("usecase.copy_message.execute");

        async {
            let payload = self.extractor.execute(message_root).await;

            if let RichCopyOutcome::Copied(included) = self.negotiator.execute(&payload).await {
                return CopyResult::from_rich(included);
            }

            let Some(text) = payload.text.as_deref() else {
                tracing::info!("no copyable content found");
                return CopyResult::Failure(CopyErrorKind::NoContent);
            };

            if self.fallback.execute(text).await {
                CopyResult::plain_text()
            } else {
                CopyResult::Failure(CopyErrorKind::NoText)
            }
        }
        .instrument(span)
        .await
    }

    /// Resolves the message enclosing an action container and copies it.
    pub async fn copy_from_container(&self, container: &D::Element) -> CopyResult {
        let span = info_span!("usecase.copy_message.copy_from_container");

        async {
            match self.resolver.execute(container) {
                Some(root) => self.execute(&root).await,
                None => {
                    tracing::warn!(?container, "no message root for container");
                    CopyResult::Failure(CopyErrorKind::NoMessageRoot)
                }
            }
        }
        .instrument(span)
        .await
    }
}

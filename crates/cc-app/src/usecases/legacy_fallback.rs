use std::rc::Rc;

use cc_core::ports::{DomError, DomPort, TextClipboardPort};
use tracing::{info_span, Instrument};

/// Plain-text copy used when the structured clipboard is missing or refuses
/// every attempt.
///
/// The direct text writer is tried first. If it rejects the write, the text is
/// placed in an invisible `textarea`, selected and copied with the document's
/// copy command. The `textarea` is always removed again.
pub struct LegacyFallbackWriter<D: DomPort> {
    dom: D,
    text_clipboard: Rc<dyn TextClipboardPort>,
}

impl<D: DomPort> LegacyFallbackWriter<D> {
    pub fn new(dom: D, text_clipboard: Rc<dyn TextClipboardPort>) -> Self {
        Self {
            dom,
            text_clipboard,
        }
    }

    /// Returns whether the text reached the clipboard. Never fails.
    pub async fn execute(&self, text: &str) -> bool {
        let span = info_span!("usecase.legacy_fallback.execute", len = text.len());
        self.write(text).instrument(span).await
    }

    async fn write(&self, text: &str) -> bool {
        match self.text_clipboard.write_text(text).await {
            Ok(()) => {
                tracing::info!("plain text written to clipboard");
                return true;
            }
            Err(err) => {
                tracing::warn!(error = %err, "plain text write rejected, using copy command");
            }
        }

        match self.copy_via_selection(text) {
            Ok(copied) => {
                tracing::info!(copied, "copy command finished");
                copied
            }
            Err(err) => {
                tracing::warn!(error = %err, "copy command fallback failed");
                false
            }
        }
    }

    fn copy_via_selection(&self, text: &str) -> Result<bool, DomError> {
        let body = self.dom.body().ok_or(DomError::NoBody)?;
        let surface = self.dom.create_element("textarea")?;
        self.dom.set_value(&surface, text);
        self.dom.set_style(&surface, "position", "fixed")?;
        self.dom.set_style(&surface, "opacity", "0")?;
        self.dom.append_child(&body, &surface)?;

        let copied = self
            .dom
            .focus_and_select(&surface)
            .and_then(|()| self.dom.exec_copy_command());

        self.dom.remove(&surface);
        copied
    }
}

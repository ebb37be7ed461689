//! Desktop clipboard adapters.
//!
//! clipboard-rs carries the structured item (text, HTML and one image);
//! arboard handles the plain-text writer.

use async_trait::async_trait;
use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContent, ClipboardContext, RustImageData};

use cc_core::clipboard::{ClipboardAttempt, ClipboardPart, MimeType};
use cc_core::ports::{ClipboardError, RichClipboardPort, TextClipboardPort};

/// Structured clipboard backed by the operating system clipboard.
///
/// The desktop clipboard holds a single image per item, so attempts carrying
/// more than one image are rejected and the caller degrades.
pub struct SystemRichClipboard {
    ctx: Option<ClipboardContext>,
}

impl SystemRichClipboard {
    /// Opens the system clipboard. A clipboard that cannot be opened makes
    /// the adapter report itself unavailable instead of failing.
    pub fn new() -> Self {
        let ctx = match ClipboardContext::new() {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                tracing::warn!(error = %err, "system clipboard unavailable");
                None
            }
        };
        Self { ctx }
    }

    fn to_contents(attempt: &ClipboardAttempt) -> Result<Vec<ClipboardContent>, ClipboardError> {
        if attempt.image_parts().count() > 1 {
            return Err(ClipboardError::Rejected(
                "system clipboard holds a single image".into(),
            ));
        }

        attempt
            .parts()
            .iter()
            .map(Self::to_content)
            .collect()
    }

    fn to_content(part: &ClipboardPart) -> Result<ClipboardContent, ClipboardError> {
        let utf8 = |part: &ClipboardPart| {
            String::from_utf8(part.data.to_vec())
                .map_err(|e| ClipboardError::Rejected(format!("{}: {e}", part.mime)))
        };

        if part.mime == MimeType::text_plain() {
            return Ok(ClipboardContent::Text(utf8(part)?));
        }
        if part.mime == MimeType::text_html() {
            return Ok(ClipboardContent::Html(utf8(part)?));
        }
        if part.mime.is_image() {
            let image = RustImageData::from_bytes(&part.data)
                .map_err(|e| ClipboardError::Rejected(format!("undecodable image: {e}")))?;
            return Ok(ClipboardContent::Image(image));
        }

        Ok(ClipboardContent::Other(
            part.mime.to_string(),
            part.data.to_vec(),
        ))
    }
}

impl Default for SystemRichClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl RichClipboardPort for SystemRichClipboard {
    fn is_available(&self) -> bool {
        self.ctx.is_some()
    }

    async fn write(&self, attempt: &ClipboardAttempt) -> Result<(), ClipboardError> {
        let ctx = self.ctx.as_ref().ok_or(ClipboardError::Unavailable)?;
        let contents = Self::to_contents(attempt)?;
        ctx.set(contents)
            .map_err(|e| ClipboardError::Backend(e.to_string()))
    }
}

/// Plain-text clipboard writer.
#[derive(Debug, Default)]
pub struct SystemTextClipboard;

impl SystemTextClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl TextClipboardPort for SystemTextClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Backend(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Rejected(e.to_string()))
    }
}

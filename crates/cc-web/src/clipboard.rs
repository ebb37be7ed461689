use async_trait::async_trait;
use js_sys::{Array, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Window};

use cc_core::clipboard::{ClipboardAttempt, ClipboardPart};
use cc_core::ports::{ClipboardError, RichClipboardPort, TextClipboardPort};

use crate::js::{describe, method, property};

// ClipboardItem and navigator.clipboard are reached through reflection so
// that a page without them degrades instead of failing to link.

fn clipboard(window: &Window) -> Option<JsValue> {
    property(&window.navigator(), "clipboard")
}

async fn settle(result: Result<JsValue, JsValue>) -> Result<(), ClipboardError> {
    let promise = result
        .map_err(|err| ClipboardError::Rejected(describe(&err)))?
        .dyn_into::<Promise>()
        .map_err(|_| ClipboardError::Backend("clipboard call returned no promise".to_string()))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|err| ClipboardError::Rejected(describe(&err)))
}

/// `navigator.clipboard.write` with a single `ClipboardItem`.
#[derive(Clone)]
pub struct WebRichClipboard {
    window: Window,
}

impl WebRichClipboard {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn blob(part: &ClipboardPart) -> Result<Blob, ClipboardError> {
        let bytes = Uint8Array::from(&part.data[..]);
        let options = BlobPropertyBag::new();
        options.set_type(part.mime.as_str());
        Blob::new_with_u8_array_sequence_and_options(&Array::of1(&bytes), &options)
            .map_err(|err| ClipboardError::Backend(describe(&err)))
    }

    fn item(&self, attempt: &ClipboardAttempt) -> Result<JsValue, ClipboardError> {
        let data = Object::new();
        for part in attempt.parts() {
            Reflect::set(
                &data,
                &JsValue::from_str(part.mime.as_str()),
                &Self::blob(part)?,
            )
            .map_err(|err| ClipboardError::Backend(describe(&err)))?;
        }

        let constructor = property(&self.window, "ClipboardItem")
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
            .ok_or(ClipboardError::Unavailable)?;
        // Unsupported types throw here, before anything reaches the clipboard.
        Reflect::construct(&constructor, &Array::of1(&data))
            .map_err(|err| ClipboardError::Rejected(describe(&err)))
    }
}

#[async_trait(?Send)]
impl RichClipboardPort for WebRichClipboard {
    fn is_available(&self) -> bool {
        property(&self.window, "ClipboardItem").is_some()
            && clipboard(&self.window)
                .and_then(|clipboard| method(&clipboard, "write"))
                .is_some()
    }

    async fn write(&self, attempt: &ClipboardAttempt) -> Result<(), ClipboardError> {
        let clipboard = clipboard(&self.window).ok_or(ClipboardError::Unavailable)?;
        let write = method(&clipboard, "write").ok_or(ClipboardError::Unavailable)?;
        let item = self.item(attempt)?;
        settle(write.call1(&clipboard, &Array::of1(&item))).await
    }
}

/// `navigator.clipboard.writeText`.
#[derive(Clone)]
pub struct WebTextClipboard {
    window: Window,
}

impl WebTextClipboard {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

#[async_trait(?Send)]
impl TextClipboardPort for WebTextClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = clipboard(&self.window).ok_or(ClipboardError::Unavailable)?;
        let write_text = method(&clipboard, "writeText").ok_or(ClipboardError::Unavailable)?;
        settle(write_text.call1(&clipboard, &JsValue::from_str(text))).await
    }
}

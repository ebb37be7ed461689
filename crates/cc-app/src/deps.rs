//! # Copy Dependencies
//!
//! Parameter grouping for the host capabilities the copy pipeline needs.
//! Not a builder: every port is required.

use std::rc::Rc;

use cc_core::ports::{ImageFetchPort, RichClipboardPort, TextClipboardPort};

/// Host ports other than the document itself.
#[derive(Clone)]
pub struct CopyDeps {
    pub rich_clipboard: Rc<dyn RichClipboardPort>,
    pub text_clipboard: Rc<dyn TextClipboardPort>,
    pub image_fetcher: Rc<dyn ImageFetchPort>,
}

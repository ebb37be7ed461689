//! # cc-web
//!
//! Browser adapters for the copy pipeline and the wasm entry point that
//! decorates the host chat page.
//!
//! Everything here binds to `web-sys`, so the crate is empty on native
//! targets.

#![cfg(target_arch = "wasm32")]

mod clipboard;
mod dom;
mod entry;
mod fetch;
mod js;

pub use clipboard::{WebRichClipboard, WebTextClipboard};
pub use dom::{WebDom, WebObservation};
pub use entry::{start, start_with_config, stop};
pub use fetch::WebImageFetcher;

mod clipboard;
mod dom;
mod errors;
mod fetch;

pub use clipboard::{RichClipboardPort, TextClipboardPort};
pub use dom::{ActivationFuture, ActivationHandler, AddedElementsCallback, DomPort};
pub use errors::{ClipboardError, DomError, FetchError};
pub use fetch::{FetchedResource, ImageFetchPort};

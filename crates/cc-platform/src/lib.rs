//! Host adapters for the chatcopy ports.
//!
//! - [`dom`]: an in-memory document with selector matching, rendered text
//!   and subtree observation, used headless by the CLI and tests.
//! - [`clipboard`]: the desktop clipboard and a recording clipboard.
//! - [`fetch`]: HTTP and canned image fetchers.

pub mod clipboard;
pub mod dom;
pub mod fetch;

pub use clipboard::{AcceptPolicy, RecordingClipboard, SystemRichClipboard, SystemTextClipboard};
pub use dom::{el, El, FixtureNode, InMemoryDocument, NodeId};
pub use fetch::{HttpImageFetcher, InMemoryImageFetcher};

//! Copy pipeline use cases, leaves first.
//!
//! [ResolveMessageRoot]   container -> message root
//!          ↓
//! [ExtractContent]       text, cleaned HTML, images
//!          ↓
//! [NegotiateClipboard]   structured writes, richest first
//!          ↓
//! [LegacyFallbackWriter] plain text, then copy command

pub mod copy_message;
pub mod extract_content;
pub mod legacy_fallback;
pub mod negotiate_clipboard;
pub mod resolve_message_root;

pub use copy_message::CopyMessage;
pub use extract_content::ExtractContent;
pub use legacy_fallback::LegacyFallbackWriter;
pub use negotiate_clipboard::{AttemptStrategy, NegotiateClipboard};
pub use resolve_message_root::ResolveMessageRoot;

//! Clipboard ports - abstract the structured and plain-text clipboard writers
//!
//! Calls are alternatives tried one after another, never concurrently, so
//! implementations may hold exclusive platform state for the duration of a
//! call.

use async_trait::async_trait;

use super::ClipboardError;
use crate::clipboard::ClipboardAttempt;

/// Structured clipboard writer (`navigator.clipboard.write` and its kin).
#[async_trait(?Send)]
pub trait RichClipboardPort {
    /// Capability check; `false` means no structured write is ever attempted.
    fn is_available(&self) -> bool;

    /// Writes all parts of `attempt` as one clipboard item.
    async fn write(&self, attempt: &ClipboardAttempt) -> Result<(), ClipboardError>;
}

/// Direct plain-text clipboard writer (`navigator.clipboard.writeText`).
#[async_trait(?Send)]
pub trait TextClipboardPort {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

use async_trait::async_trait;
use std::cell::{Cell, RefCell};

use cc_core::clipboard::ClipboardAttempt;
use cc_core::ports::{ClipboardError, RichClipboardPort, TextClipboardPort};

/// Which structured writes a [`RecordingClipboard`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptPolicy {
    #[default]
    AcceptAll,
    /// Rejects any item carrying an image, like writers with size limits.
    RejectImages,
    RejectAll,
}

/// In-memory clipboard recording every write it is offered.
///
/// Implements both clipboard ports so a single instance can stand in for the
/// whole platform clipboard.
#[derive(Debug)]
pub struct RecordingClipboard {
    rich_available: Cell<bool>,
    policy: Cell<AcceptPolicy>,
    text_enabled: Cell<bool>,
    attempts: RefCell<Vec<ClipboardAttempt>>,
    accepted: RefCell<Option<ClipboardAttempt>>,
    text_writes: RefCell<Vec<String>>,
}

impl Default for RecordingClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self {
            rich_available: Cell::new(true),
            policy: Cell::new(AcceptPolicy::AcceptAll),
            text_enabled: Cell::new(true),
            attempts: RefCell::new(Vec::new()),
            accepted: RefCell::new(None),
            text_writes: RefCell::new(Vec::new()),
        }
    }

    /// A clipboard without a structured writer.
    pub fn text_only() -> Self {
        let clipboard = Self::new();
        clipboard.rich_available.set(false);
        clipboard
    }

    pub fn with_policy(policy: AcceptPolicy) -> Self {
        let clipboard = Self::new();
        clipboard.policy.set(policy);
        clipboard
    }

    pub fn set_policy(&self, policy: AcceptPolicy) {
        self.policy.set(policy);
    }

    /// Makes direct plain-text writes fail.
    pub fn set_text_enabled(&self, enabled: bool) {
        self.text_enabled.set(enabled);
    }

    /// Every structured write offered, accepted or not.
    pub fn attempts(&self) -> Vec<ClipboardAttempt> {
        self.attempts.borrow().clone()
    }

    /// The structured write currently on the clipboard.
    pub fn accepted(&self) -> Option<ClipboardAttempt> {
        self.accepted.borrow().clone()
    }

    pub fn text_writes(&self) -> Vec<String> {
        self.text_writes.borrow().clone()
    }
}

#[async_trait(?Send)]
impl RichClipboardPort for RecordingClipboard {
    fn is_available(&self) -> bool {
        self.rich_available.get()
    }

    async fn write(&self, attempt: &ClipboardAttempt) -> Result<(), ClipboardError> {
        self.attempts.borrow_mut().push(attempt.clone());

        let has_images = attempt.included().images_included > 0;
        match self.policy.get() {
            AcceptPolicy::RejectAll => {
                Err(ClipboardError::Rejected("write not allowed".into()))
            }
            AcceptPolicy::RejectImages if has_images => {
                Err(ClipboardError::Rejected("image payload not allowed".into()))
            }
            _ => {
                *self.accepted.borrow_mut() = Some(attempt.clone());
                Ok(())
            }
        }
    }
}

#[async_trait(?Send)]
impl TextClipboardPort for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if !self.text_enabled.get() {
            return Err(ClipboardError::Rejected("document is not focused".into()));
        }
        self.text_writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

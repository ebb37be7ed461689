use serde::{Serialize, Serializer};

use super::IncludedParts;

/// Why a copy could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyErrorKind {
    /// The container could not be resolved to an enclosing message.
    NoMessageRoot,
    /// Nothing could be extracted, or nothing could be sent.
    NoContent,
    /// The plain-text fallback ran and the clipboard write failed.
    NoText,
    Unknown,
}

impl CopyErrorKind {
    pub const ALL: [CopyErrorKind; 4] = [
        CopyErrorKind::NoMessageRoot,
        CopyErrorKind::NoContent,
        CopyErrorKind::NoText,
        CopyErrorKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CopyErrorKind::NoMessageRoot => "no-message-root",
            CopyErrorKind::NoContent => "no-content",
            CopyErrorKind::NoText => "no-text",
            CopyErrorKind::Unknown => "unknown",
        }
    }
}

/// Outcome of one copy operation.
///
/// `Success` means at least one representation was confirmed written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyResult {
    Success {
        text_copied: bool,
        images_copied: usize,
        used_rich_clipboard: bool,
    },
    Failure(CopyErrorKind),
}

impl CopyResult {
    /// Result of a structured write that the platform accepted.
    ///
    /// `used_rich_clipboard` tracks whether HTML made it onto the clipboard,
    /// not merely whether the structured API was used.
    pub fn from_rich(parts: IncludedParts) -> Self {
        CopyResult::Success {
            text_copied: parts.text_included || parts.html_included,
            images_copied: parts.images_included,
            used_rich_clipboard: parts.html_included,
        }
    }

    /// Success through the plain-text fallback.
    pub fn plain_text() -> Self {
        CopyResult::Success {
            text_copied: true,
            images_copied: 0,
            used_rich_clipboard: false,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CopyResult::Success { .. })
    }

    /// The failure kind, or `None` on success.
    pub fn error(&self) -> Option<CopyErrorKind> {
        match self {
            CopyResult::Success { .. } => None,
            CopyResult::Failure(kind) => Some(*kind),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CopyResultRepr {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_copied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    images_copied: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    used_rich_clipboard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CopyErrorKind>,
}

impl Serialize for CopyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match *self {
            CopyResult::Success {
                text_copied,
                images_copied,
                used_rich_clipboard,
            } => CopyResultRepr {
                success: true,
                text_copied: Some(text_copied),
                images_copied: Some(images_copied),
                used_rich_clipboard: Some(used_rich_clipboard),
                error: None,
            },
            CopyResult::Failure(kind) => CopyResultRepr {
                success: false,
                text_copied: None,
                images_copied: None,
                used_rich_clipboard: None,
                error: Some(kind),
            },
        };
        repr.serialize(serializer)
    }
}

/// Why the structured clipboard path did not deliver anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotCopiedReason {
    /// The environment has no structured clipboard writer.
    Unavailable,
    /// No attempt could be built from the payload.
    NothingToSend,
    /// Every attempt was rejected by the platform.
    Rejected,
}

/// Result of negotiating with the structured clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RichCopyOutcome {
    Copied(IncludedParts),
    NotCopied(NotCopiedReason),
}

mod attempt;
mod messages;
mod mime;
mod payload;
mod result;

pub use attempt::{ClipboardAttempt, ClipboardPart, IncludedParts};
pub use messages::{error_message, result_message, COPYING_LABEL, IDLE_LABEL};
pub use mime::MimeType;
pub use payload::{ExtractionPayload, ImageBlob};
pub use result::{CopyErrorKind, CopyResult, NotCopiedReason, RichCopyOutcome};

use std::borrow::Cow;

use super::{CopyErrorKind, CopyResult};

pub const IDLE_LABEL: &str = "Copy";
pub const COPYING_LABEL: &str = "Copying...";

/// User-facing status line for a finished copy.
pub fn result_message(result: &CopyResult) -> Cow<'static, str> {
    match *result {
        CopyResult::Success {
            text_copied,
            images_copied,
            ..
        } => success_message(text_copied, images_copied),
        CopyResult::Failure(kind) => Cow::Borrowed(error_message(kind)),
    }
}

fn success_message(text_copied: bool, images_copied: usize) -> Cow<'static, str> {
    match (text_copied, images_copied) {
        (true, 0) => Cow::Borrowed("Copied text to clipboard"),
        (true, _) => Cow::Borrowed("Copied text and images to clipboard"),
        (false, 1) => Cow::Borrowed("Copied image to clipboard"),
        (false, 0) => Cow::Borrowed("Copied to clipboard"),
        (false, n) => Cow::Owned(format!("Copied {n} images to clipboard")),
    }
}

/// User-facing text for a failed copy.
pub fn error_message(kind: CopyErrorKind) -> &'static str {
    match kind {
        CopyErrorKind::NoMessageRoot => "Couldn't copy. Looks like there's no message.",
        CopyErrorKind::NoContent => "Couldn't copy. Looks like there's no content in the message.",
        CopyErrorKind::NoText => "Couldn't copy. Looks like there's no text in the message.",
        CopyErrorKind::Unknown => {
            "There was an error when copying this message, please try again."
        }
    }
}

mod memory;
mod system;

pub use memory::{AcceptPolicy, RecordingClipboard};
pub use system::{SystemRichClipboard, SystemTextClipboard};

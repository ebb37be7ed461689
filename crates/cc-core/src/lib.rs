//! # cc-core
//!
//! Core domain models and ports for chatcopy.
//!
//! This crate holds the copy payload model, the clipboard attempt rules, the
//! result taxonomy and the port traits implemented by host adapters. It has no
//! host dependencies.

pub mod clipboard;
pub mod config;
pub mod ports;
pub mod selectors;

pub use clipboard::{
    ClipboardAttempt, CopyErrorKind, CopyResult, ExtractionPayload, ImageBlob, MimeType,
};
pub use config::CopyConfig;

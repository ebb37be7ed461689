//! # Dependency Wiring
//!
//! The only place that picks concrete adapters for the copy ports. With
//! `dry_run` both clipboards are a [`RecordingClipboard`] so nothing
//! reaches the system clipboard.

use anyhow::Context;
use std::rc::Rc;

use cc_app::CopyDeps;
use cc_core::CopyConfig;
use cc_platform::clipboard::{RecordingClipboard, SystemRichClipboard, SystemTextClipboard};
use cc_platform::fetch::HttpImageFetcher;

pub struct NativeWiring {
    pub deps: CopyDeps,
    /// Set for dry runs; holds every attempted write.
    pub recorder: Option<Rc<RecordingClipboard>>,
}

pub fn wire_native(config: &CopyConfig, dry_run: bool) -> anyhow::Result<NativeWiring> {
    let image_fetcher =
        Rc::new(HttpImageFetcher::new(&config.fetch).context("Failed to build image fetcher")?);

    if dry_run {
        let recorder = Rc::new(RecordingClipboard::new());
        return Ok(NativeWiring {
            deps: CopyDeps {
                rich_clipboard: recorder.clone(),
                text_clipboard: recorder.clone(),
                image_fetcher,
            },
            recorder: Some(recorder),
        });
    }

    Ok(NativeWiring {
        deps: CopyDeps {
            rich_clipboard: Rc::new(SystemRichClipboard::new()),
            text_clipboard: Rc::new(SystemTextClipboard::new()),
            image_fetcher,
        },
        recorder: None,
    })
}

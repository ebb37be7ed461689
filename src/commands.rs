//! Commands run against a document fixture.
//!
//! A fixture is a JSON element tree placed inside `<body>` of an
//! [`InMemoryDocument`]; the engine then runs over it as it would over the
//! live page.

use anyhow::{bail, Context};
use std::path::Path;

use cc_app::CopyEngine;
use cc_core::clipboard::ClipboardAttempt;
use cc_core::ports::DomPort;
use cc_core::CopyConfig;
use cc_platform::dom::{FixtureNode, InMemoryDocument};

use crate::bootstrap::{wire_native, NativeWiring};

/// Outcome of [`copy_message`].
#[derive(Debug, Clone)]
pub struct CopyReport {
    /// Number of affordances attached by the scan.
    pub attached: usize,
    /// Status the affordance shows after the copy.
    pub status: String,
    /// Accepted structured write, dry runs only.
    pub recorded: Option<ClipboardAttempt>,
    /// Plain-text writes, dry runs only.
    pub recorded_text: Vec<String>,
}

pub fn load_fixture(path: &Path) -> anyhow::Result<InMemoryDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
    let root = FixtureNode::from_json(&json)?;
    let doc = InMemoryDocument::new();
    doc.append_to_body(root.into_element());
    Ok(doc)
}

/// Loads the fixture with relative links resolving against `fetch.base_url`.
fn prepare_document(config: &CopyConfig, fixture: &Path) -> anyhow::Result<InMemoryDocument> {
    let doc = load_fixture(fixture)?;
    if let Some(base) = &config.fetch.base_url {
        doc.set_base_url(base).context("Invalid fetch.base_url")?;
    }
    Ok(doc)
}

/// Decorates the fixture's action containers; returns how many were found.
pub fn scan_fixture(config: &CopyConfig, fixture: &Path) -> anyhow::Result<usize> {
    let doc = prepare_document(config, fixture)?;
    let wiring = wire_native(config, true)?;
    let engine = CopyEngine::new(doc, wiring.deps, config);
    let attached = engine.start()?;
    engine.stop();
    Ok(attached)
}

/// Scans the fixture and activates the affordance at `index`.
pub async fn copy_message(
    config: &CopyConfig,
    fixture: &Path,
    index: usize,
    dry_run: bool,
) -> anyhow::Result<CopyReport> {
    let wiring = wire_native(config, dry_run)?;
    copy_with_wiring(config, fixture, index, wiring).await
}

/// [`copy_message`] over caller-supplied adapters.
///
/// The headless document has no clipboard behind its copy command, so the
/// command only reports success when writes are being recorded.
///
/// # Errors
///
/// Returns error if the fixture cannot be loaded, the engine cannot start,
/// or there is no copy button at `index`.
pub async fn copy_with_wiring(
    config: &CopyConfig,
    fixture: &Path,
    index: usize,
    wiring: NativeWiring,
) -> anyhow::Result<CopyReport> {
    let doc = prepare_document(config, fixture)?;
    doc.set_copy_command_enabled(wiring.recorder.is_some());
    let engine = CopyEngine::new(doc.clone(), wiring.deps, config);
    let attached = engine.start()?;

    let selector = format!("button[{}]", config.marker_attribute);
    let buttons = doc.query_selector_all(&doc.body_id(), &selector)?;
    let Some(button) = buttons.get(index).copied() else {
        bail!("no copy button at index {index} ({} found)", buttons.len());
    };

    tracing::info!(index, "activating copy button");
    doc.click(button).await;
    engine.stop();

    let status = doc
        .get_attribute(&button, "title")
        .context("copy button has no status")?;
    let (recorded, recorded_text) = match &wiring.recorder {
        Some(recorder) => (recorder.accepted(), recorder.text_writes()),
        None => (None, Vec::new()),
    };

    Ok(CopyReport {
        attached,
        status,
        recorded,
        recorded_text,
    })
}

//! Injection engine and affordance lifecycle.

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use cc_app::{CopyDeps, CopyEngine};
use cc_core::clipboard::{
    error_message, ClipboardAttempt, CopyErrorKind, COPYING_LABEL, IDLE_LABEL,
};
use cc_core::ports::{ClipboardError, DomPort, RichClipboardPort};
use cc_core::CopyConfig;
use cc_platform::clipboard::RecordingClipboard;
use cc_platform::dom::{el, El, InMemoryDocument, NodeId};
use cc_platform::fetch::InMemoryImageFetcher;

const MARK: &str = "data-chat-copy-button";

static TRACE_INIT: Once = Once::new();

fn init_tracing() {
    TRACE_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn engine_with(
    doc: &InMemoryDocument,
    rich: Rc<dyn RichClipboardPort>,
) -> CopyEngine<InMemoryDocument> {
    let deps = CopyDeps {
        rich_clipboard: rich,
        text_clipboard: Rc::new(RecordingClipboard::new()),
        image_fetcher: Rc::new(InMemoryImageFetcher::new()),
    };
    CopyEngine::new(doc.clone(), deps, &CopyConfig::default())
}

fn engine(doc: &InMemoryDocument) -> CopyEngine<InMemoryDocument> {
    engine_with(doc, Rc::new(RecordingClipboard::new()))
}

fn chat_message(text: &str) -> El {
    el("div")
        .attr("role", "listitem")
        .child(
            el("div")
                .qa("message_container")
                .child(el("div").qa("message-text").text(text))
                .child(el("div").qa("message_actions")),
        )
}

fn buttons(doc: &InMemoryDocument, scope: NodeId) -> Vec<NodeId> {
    doc.query_selector_all(&scope, &format!("button[{MARK}]"))
        .unwrap()
}

fn title(doc: &InMemoryDocument, button: NodeId) -> Option<String> {
    doc.get_attribute(&button, "title")
}

#[test]
fn start_decorates_existing_and_added_containers_once() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let existing = doc.append_to_body(chat_message("first"));
    let engine = engine(&doc);

    assert_eq!(engine.start().unwrap(), 1);
    assert!(engine.is_running());

    let added = doc.append_to_body(chat_message("second"));
    doc.flush_mutations();

    assert_eq!(buttons(&doc, existing).len(), 1);
    assert_eq!(buttons(&doc, added).len(), 1);
    assert_eq!(buttons(&doc, doc.body_id()).len(), 2);
}

#[test]
fn repeated_start_keeps_a_single_observer() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let engine = engine(&doc);

    engine.start().unwrap();
    engine.start().unwrap();
    assert_eq!(doc.active_observers(), 1);

    doc.append_to_body(chat_message("once"));
    doc.flush_mutations();
    assert_eq!(buttons(&doc, doc.body_id()).len(), 1);
}

#[test]
fn stop_disconnects_and_start_rearms() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let engine = engine(&doc);
    engine.start().unwrap();

    engine.stop();
    assert!(!engine.is_running());
    assert_eq!(doc.active_observers(), 0);
    let missed = doc.append_to_body(chat_message("while stopped"));
    doc.flush_mutations();
    assert!(buttons(&doc, missed).is_empty());

    // Restart scans again, picking up what was missed.
    assert_eq!(engine.start().unwrap(), 1);
    let later = doc.append_to_body(chat_message("after restart"));
    doc.flush_mutations();
    assert_eq!(buttons(&doc, missed).len(), 1);
    assert_eq!(buttons(&doc, later).len(), 1);
}

#[test]
fn recreated_containers_are_decorated_again() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let message = doc.append_to_body(chat_message("virtualized"));
    let engine = engine(&doc);
    engine.start().unwrap();

    doc.remove(&message);
    let recreated = doc.append_to_body(chat_message("virtualized"));
    doc.flush_mutations();

    assert_eq!(buttons(&doc, recreated).len(), 1);
}

#[test]
fn containers_nested_in_added_subtrees_are_found() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let engine = engine(&doc);
    engine.start().unwrap();

    let list = doc.append_to_body(el("div").class("c-virtual_list"));
    doc.append(list, chat_message("deep"));
    doc.flush_mutations();

    assert_eq!(buttons(&doc, list).len(), 1);
}

#[tokio::test]
async fn activation_copies_the_message_and_renders_status() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let message = doc.append_to_body(chat_message("Ship it"));
    let clipboard = Rc::new(RecordingClipboard::new());
    let engine = engine_with(&doc, clipboard.clone());
    engine.start().unwrap();

    let button = buttons(&doc, message)[0];
    assert_eq!(title(&doc, button).as_deref(), Some(IDLE_LABEL));

    doc.click(button).await;

    assert_eq!(title(&doc, button).as_deref(), Some("Copied text to clipboard"));
    assert_eq!(
        doc.get_attribute(&button, "aria-label").as_deref(),
        Some("Copied text to clipboard")
    );
    let accepted = clipboard.accepted().unwrap();
    let html = accepted
        .part(&cc_core::clipboard::MimeType::text_html())
        .unwrap();
    assert_eq!(&html.data[..], b"Ship it");
}

#[tokio::test]
async fn activation_outside_a_message_reports_missing_message() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let bar = doc.append_to_body(el("div").qa("message_actions"));
    let engine = engine(&doc);
    engine.start().unwrap();

    let button = buttons(&doc, bar)[0];
    doc.click(button).await;

    assert_eq!(
        title(&doc, button).as_deref(),
        Some("Couldn't copy. Looks like there's no message.")
    );
}

/// Holds the first write open until released.
struct GatedClipboard {
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    writes: Cell<usize>,
}

#[async_trait(?Send)]
impl RichClipboardPort for GatedClipboard {
    fn is_available(&self) -> bool {
        true
    }

    async fn write(&self, _attempt: &ClipboardAttempt) -> Result<(), ClipboardError> {
        self.writes.set(self.writes.get() + 1);
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(())
    }
}

#[tokio::test]
async fn activation_during_a_copy_is_ignored() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let message = doc.append_to_body(chat_message("slow"));
    let (release, gate) = oneshot::channel();
    let clipboard = Rc::new(GatedClipboard {
        gate: RefCell::new(Some(gate)),
        writes: Cell::new(0),
    });
    let engine = engine_with(&doc, clipboard.clone());
    engine.start().unwrap();
    let button = buttons(&doc, message)[0];

    let first = doc.click(button);
    let observer_doc = doc.clone();
    let second = async move {
        observer_doc.click(button).await;
        assert_eq!(title(&observer_doc, button).as_deref(), Some(COPYING_LABEL));
        release.send(()).unwrap();
    };
    futures::join!(first, second);

    assert_eq!(clipboard.writes.get(), 1);
    assert_eq!(title(&doc, button).as_deref(), Some("Copied text to clipboard"));

    doc.click(button).await;
    assert_eq!(clipboard.writes.get(), 2);
}

struct ThrowingClipboard;

#[async_trait(?Send)]
impl RichClipboardPort for ThrowingClipboard {
    fn is_available(&self) -> bool {
        true
    }

    async fn write(&self, _attempt: &ClipboardAttempt) -> Result<(), ClipboardError> {
        panic!("host clipboard threw");
    }
}

#[tokio::test]
async fn panicking_copy_reports_unknown_error_and_rearms() {
    init_tracing();
    let doc = InMemoryDocument::new();
    let message = doc.append_to_body(chat_message("boom"));
    let engine = engine_with(&doc, Rc::new(ThrowingClipboard));
    engine.start().unwrap();
    let button = buttons(&doc, message)[0];

    doc.click(button).await;

    assert_eq!(
        title(&doc, button).as_deref(),
        Some(error_message(CopyErrorKind::Unknown))
    );
    doc.click(button).await;
    assert_eq!(
        title(&doc, button).as_deref(),
        Some(error_message(CopyErrorKind::Unknown))
    );
}

//! Copy pipeline behaviour against the in-memory document.

use async_trait::async_trait;
use mockall::mock;
use std::rc::Rc;

use cc_app::{CopyDeps, CopyMessage};
use cc_core::clipboard::{ClipboardAttempt, CopyErrorKind, CopyResult, MimeType};
use cc_core::ports::{
    ClipboardError, DomPort, ImageFetchPort, RichClipboardPort, TextClipboardPort,
};
use cc_core::CopyConfig;
use cc_platform::clipboard::{AcceptPolicy, RecordingClipboard};
use cc_platform::dom::{el, El, InMemoryDocument, NodeId};
use cc_platform::fetch::InMemoryImageFetcher;

mock! {
    pub RichClipboard {}

    #[async_trait(?Send)]
    impl RichClipboardPort for RichClipboard {
        fn is_available(&self) -> bool;
        async fn write(&self, attempt: &ClipboardAttempt) -> Result<(), ClipboardError>;
    }
}

mock! {
    pub TextClipboard {}

    #[async_trait(?Send)]
    impl TextClipboardPort for TextClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
    }
}

fn copier(
    doc: &InMemoryDocument,
    rich: Rc<dyn RichClipboardPort>,
    text: Rc<dyn TextClipboardPort>,
    fetcher: Rc<dyn ImageFetchPort>,
) -> CopyMessage<InMemoryDocument> {
    let deps = CopyDeps {
        rich_clipboard: rich,
        text_clipboard: text,
        image_fetcher: fetcher,
    };
    CopyMessage::new(doc.clone(), deps, &CopyConfig::default())
}

fn recording_copier(
    doc: &InMemoryDocument,
    clipboard: &Rc<RecordingClipboard>,
    fetcher: InMemoryImageFetcher,
) -> CopyMessage<InMemoryDocument> {
    copier(doc, clipboard.clone(), clipboard.clone(), Rc::new(fetcher))
}

fn message(doc: &InMemoryDocument, content: El) -> NodeId {
    doc.append_to_body(el("div").qa("message_container").child(content))
}

fn thumbnail(href: &str) -> El {
    el("a").qa("message_file_image_thumbnail").attr("href", href)
}

fn text_of(attempt: &ClipboardAttempt, mime: MimeType) -> Option<String> {
    attempt
        .part(&mime)
        .map(|part| String::from_utf8(part.data.to_vec()).unwrap())
}

#[tokio::test]
async fn matched_text_is_copied_exactly() {
    let doc = InMemoryDocument::new();
    let root = message(&doc, el("div").qa("message-text").text("  Hello   world \n"));

    let mut rich = MockRichClipboard::new();
    rich.expect_is_available().return_const(true);
    rich.expect_write()
        .withf(|attempt| {
            text_of(attempt, MimeType::text_plain()).as_deref() == Some("Hello world")
        })
        .times(1)
        .returning(|_| Ok(()));
    let mut text = MockTextClipboard::new();
    text.expect_write_text().never();

    let result = copier(
        &doc,
        Rc::new(rich),
        Rc::new(text),
        Rc::new(InMemoryImageFetcher::new()),
    )
    .execute(&root)
    .await;

    assert_eq!(
        result,
        CopyResult::Success {
            text_copied: true,
            images_copied: 0,
            used_rich_clipboard: true,
        }
    );
}

#[tokio::test]
async fn empty_message_has_no_content() {
    let doc = InMemoryDocument::new();
    let root = message(&doc, el("div").child(el("script").text("track()")));

    let mut rich = MockRichClipboard::new();
    rich.expect_is_available().return_const(true);
    rich.expect_write().never();
    let mut text = MockTextClipboard::new();
    text.expect_write_text().never();

    let result = copier(
        &doc,
        Rc::new(rich),
        Rc::new(text),
        Rc::new(InMemoryImageFetcher::new()),
    )
    .execute(&root)
    .await;

    assert_eq!(result, CopyResult::Failure(CopyErrorKind::NoContent));
}

#[tokio::test]
async fn missing_capability_goes_straight_to_plain_text() {
    let doc = InMemoryDocument::new();
    let root = message(&doc, el("div").qa("message-text").text("plain"));

    let mut rich = MockRichClipboard::new();
    rich.expect_is_available().return_const(false);
    rich.expect_write().never();
    let mut text = MockTextClipboard::new();
    text.expect_write_text()
        .withf(|text| text == "plain")
        .times(1)
        .returning(|_| Ok(()));

    let result = copier(
        &doc,
        Rc::new(rich),
        Rc::new(text),
        Rc::new(InMemoryImageFetcher::new()),
    )
    .execute(&root)
    .await;

    assert_eq!(result, CopyResult::plain_text());
}

#[tokio::test]
async fn missing_capability_without_text_has_no_content() {
    let doc = InMemoryDocument::new();
    let root = message(&doc, el("div").child(el("img").attr("src", "emoji.png")));

    let mut rich = MockRichClipboard::new();
    rich.expect_is_available().return_const(false);
    rich.expect_write().never();
    let mut text = MockTextClipboard::new();
    text.expect_write_text().never();

    let result = copier(
        &doc,
        Rc::new(rich),
        Rc::new(text),
        Rc::new(InMemoryImageFetcher::new()),
    )
    .execute(&root)
    .await;

    assert_eq!(result, CopyResult::Failure(CopyErrorKind::NoContent));
}

#[tokio::test]
async fn image_rejection_degrades_to_text_and_html() {
    let doc = InMemoryDocument::new();
    let root = message(
        &doc,
        el("div")
            .child(el("div").qa("message-text").child(el("b").text("look")))
            .child(thumbnail("https://files/one.png"))
            .child(thumbnail("https://files/two.jpg")),
    );
    let fetcher = InMemoryImageFetcher::new()
        .with_image("https://files/one.png", "image/png", vec![1u8])
        .with_image("https://files/two.jpg", "image/jpeg", vec![2u8]);
    let clipboard = Rc::new(RecordingClipboard::with_policy(AcceptPolicy::RejectImages));

    let result = recording_copier(&doc, &clipboard, fetcher).execute(&root).await;

    assert_eq!(
        result,
        CopyResult::Success {
            text_copied: true,
            images_copied: 0,
            used_rich_clipboard: true,
        }
    );
    let attempts = clipboard.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].included().images_included, 2);
    let accepted = clipboard.accepted().unwrap();
    assert_eq!(text_of(&accepted, MimeType::text_html()).as_deref(), Some("<b>look</b>"));
    assert_eq!(accepted.image_parts().count(), 0);
}

#[tokio::test]
async fn duplicate_image_links_are_fetched_and_written_once() {
    let doc = InMemoryDocument::new();
    let root = message(
        &doc,
        el("div")
            .child(el("div").qa("message-text").text("pics"))
            .child(thumbnail("https://files/same.png"))
            .child(thumbnail("https://files/same.png")),
    );
    let fetcher = Rc::new(
        InMemoryImageFetcher::new().with_image("https://files/same.png", "image/png", vec![7u8]),
    );
    let clipboard = Rc::new(RecordingClipboard::new());

    let result = copier(&doc, clipboard.clone(), clipboard.clone(), fetcher.clone())
        .execute(&root)
        .await;

    assert_eq!(fetcher.request_count("https://files/same.png"), 1);
    assert_eq!(
        result,
        CopyResult::Success {
            text_copied: true,
            images_copied: 1,
            used_rich_clipboard: true,
        }
    );
    assert_eq!(clipboard.accepted().unwrap().image_parts().count(), 1);
}

#[tokio::test]
async fn text_without_html_is_not_reported_as_rich() {
    let doc = InMemoryDocument::new();
    // Only host chrome inside the content node: text survives, HTML is stripped.
    let root = message(
        &doc,
        el("div")
            .qa("message-text")
            .child(el("span").qa("timestamp_label").text("10:42")),
    );
    let clipboard = Rc::new(RecordingClipboard::new());

    let result = recording_copier(&doc, &clipboard, InMemoryImageFetcher::new())
        .execute(&root)
        .await;

    assert_eq!(
        result,
        CopyResult::Success {
            text_copied: true,
            images_copied: 0,
            used_rich_clipboard: false,
        }
    );
    let accepted = clipboard.accepted().unwrap();
    assert_eq!(text_of(&accepted, MimeType::text_html()), None);
}

#[tokio::test]
async fn image_only_message_copies_images() {
    let doc = InMemoryDocument::new();
    let root = message(
        &doc,
        el("span")
            .qa("message_file_meta")
            .child(thumbnail("https://files/only.gif")),
    );
    let fetcher =
        InMemoryImageFetcher::new().with_image("https://files/only.gif", "image/gif", vec![9u8]);
    let clipboard = Rc::new(RecordingClipboard::new());

    let result = recording_copier(&doc, &clipboard, fetcher).execute(&root).await;

    assert_eq!(
        result,
        CopyResult::Success {
            text_copied: false,
            images_copied: 1,
            used_rich_clipboard: false,
        }
    );
}

#[tokio::test]
async fn failed_fallback_reports_no_text() {
    let doc = InMemoryDocument::new();
    doc.set_copy_command_enabled(false);
    let root = message(&doc, el("div").qa("message-text").text("stuck"));
    let clipboard = Rc::new(RecordingClipboard::with_policy(AcceptPolicy::RejectAll));
    clipboard.set_text_enabled(false);

    let result = recording_copier(&doc, &clipboard, InMemoryImageFetcher::new())
        .execute(&root)
        .await;

    assert_eq!(result, CopyResult::Failure(CopyErrorKind::NoText));
    assert_eq!(clipboard.attempts().len(), 1);
}

#[tokio::test]
async fn rejected_rich_write_falls_back_to_copy_command() {
    let doc = InMemoryDocument::new();
    let root = message(&doc, el("div").qa("message-text").text("via selection"));
    let clipboard = Rc::new(RecordingClipboard::with_policy(AcceptPolicy::RejectAll));
    clipboard.set_text_enabled(false);

    let result = recording_copier(&doc, &clipboard, InMemoryImageFetcher::new())
        .execute(&root)
        .await;

    assert_eq!(result, CopyResult::plain_text());
    assert_eq!(doc.command_clipboard().as_deref(), Some("via selection"));
}

#[tokio::test]
async fn container_outside_any_message_has_no_root() {
    let doc = InMemoryDocument::new();
    let container = doc.append_to_body(el("div").qa("message_actions"));
    let clipboard = Rc::new(RecordingClipboard::new());

    let result = recording_copier(&doc, &clipboard, InMemoryImageFetcher::new())
        .copy_from_container(&container)
        .await;

    assert_eq!(result, CopyResult::Failure(CopyErrorKind::NoMessageRoot));
    assert!(clipboard.attempts().is_empty());
}

#[tokio::test]
async fn copy_from_container_uses_the_enclosing_message() {
    let doc = InMemoryDocument::new();
    let root = message(&doc, el("div").qa("message-text").text("from the bar"));
    let container = doc.append(root, el("div").qa("message_actions"));
    let clipboard = Rc::new(RecordingClipboard::new());

    let result = recording_copier(&doc, &clipboard, InMemoryImageFetcher::new())
        .copy_from_container(&container)
        .await;

    assert!(result.is_success());
    let accepted = clipboard.accepted().unwrap();
    assert_eq!(
        text_of(&accepted, MimeType::text_plain()).as_deref(),
        Some("from the bar")
    );
    assert!(doc.query_selector(&root, "textarea").unwrap().is_none());
}

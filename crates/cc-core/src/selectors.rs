//! Built-in selectors for the host chat application's markup.

pub const COPY_BUTTON_MARK: &str = "data-chat-copy-button";

pub const ACTION_CONTAINER_SELECTORS: &[&str] = &[
    r#"[data-qa="message_actions"]"#,
    r#"[data-qa="message_actions_container"]"#,
    r#"[data-qa="message_actions_bar"]"#,
    ".p-message_actions",
    ".c-message_actions",
    ".c-message_actions__group",
];

pub const MESSAGE_TEXT_SELECTORS: &[&str] = &[
    r#"[data-qa="message-text"]"#,
    r#"[data-qa="message_content"]"#,
    r#"[data-qa="message-body"]"#,
    ".c-message_kit__text",
    ".p-rich_text_section",
];

/// Ancestor predicates for the message root; the gallery image wins over the
/// generic containers so a single image in a gallery is copied on its own.
pub const MESSAGE_ROOT_SELECTORS: &[&str] = &[
    ".p-message_gallery_image_file.c-file_gallery_image_file",
    r#"[data-qa="message_container"]"#,
    r#"[role="listitem"]"#,
    ".c-virtual_list__item",
];

pub const CHROME_SELECTORS: &[&str] = &[
    ".c-message__edited_label",
    r#"[data-qa="message_file_meta"]"#,
    r#"[data-qa="message_sender_name"]"#,
    r#"[data-qa="timestamp_label"]"#,
];

pub const IMAGE_ANCHOR_SELECTORS: &[&str] = &["[data-qa=message_file_image_thumbnail]"];

/// Scopes each selector to elements that do not carry `marker` yet.
pub fn unmarked<S: AsRef<str>>(selectors: &[S], marker: &str) -> Vec<String> {
    selectors
        .iter()
        .map(|selector| format!("{}:not([{}])", selector.as_ref(), marker))
        .collect()
}

/// `[name]` presence selector.
pub fn has_attribute(name: &str) -> String {
    format!("[{name}]")
}

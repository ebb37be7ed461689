use cc_core::config::SelectorConfig;
use cc_core::ports::DomPort;

/// Finds the message an action container belongs to.
///
/// Each selector of the chain is tried with `closest` in priority order, so a
/// gallery image wins over the list item that also encloses it.
pub struct ResolveMessageRoot<D: DomPort> {
    dom: D,
    chain: Vec<String>,
}

impl<D: DomPort> ResolveMessageRoot<D> {
    pub fn new(dom: D, selectors: &SelectorConfig) -> Self {
        Self {
            dom,
            chain: selectors.message_roots.clone(),
        }
    }

    /// First ancestor of `start` matching the chain, tried in priority order.
    /// Selectors the host rejects are skipped.
    pub fn execute(&self, start: &D::Element) -> Option<D::Element> {
        self.chain.iter().find_map(|selector| {
            match self.dom.closest(start, selector) {
                Ok(found) => found,
                Err(err) => {
                    tracing::warn!(%selector, error = %err, "skipping message root selector");
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_platform::dom::{el, InMemoryDocument};

    fn resolver(doc: &InMemoryDocument) -> ResolveMessageRoot<InMemoryDocument> {
        ResolveMessageRoot::new(doc.clone(), &SelectorConfig::default())
    }

    #[test]
    fn gallery_file_outranks_closer_generic_ancestors() {
        let doc = InMemoryDocument::new();
        let item = doc.append_to_body(el("div").attr("role", "listitem"));
        let gallery = doc.append(
            item,
            el("div").class("p-message_gallery_image_file c-file_gallery_image_file"),
        );
        let message = doc.append(gallery, el("div").qa("message_container"));
        let actions = doc.append(message, el("div").qa("message_actions"));

        assert_eq!(resolver(&doc).execute(&actions), Some(gallery));
    }

    #[test]
    fn falls_through_the_chain_in_order() {
        let doc = InMemoryDocument::new();
        let virtual_item = doc.append_to_body(el("div").class("c-virtual_list__item"));
        let list_item = doc.append(virtual_item, el("div").attr("role", "listitem"));
        let actions = doc.append(list_item, el("div").qa("message_actions"));

        assert_eq!(resolver(&doc).execute(&actions), Some(list_item));
    }

    #[test]
    fn none_when_no_ancestor_matches() {
        let doc = InMemoryDocument::new();
        let actions = doc.append_to_body(el("div").qa("message_actions"));
        assert_eq!(resolver(&doc).execute(&actions), None);
    }

    #[test]
    fn invalid_selectors_are_skipped() {
        let doc = InMemoryDocument::new();
        let message = doc.append_to_body(el("div").qa("message_container"));
        let actions = doc.append(message, el("div"));

        let mut selectors = SelectorConfig::default();
        selectors.message_roots = vec!["[[broken".into(), "[data-qa=message_container]".into()];
        let resolver = ResolveMessageRoot::new(doc.clone(), &selectors);

        assert_eq!(resolver.execute(&actions), Some(message));
    }
}

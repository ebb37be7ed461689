use futures::future::{join_all, LocalBoxFuture};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use reqwest::Url;
use std::rc::Rc;

use cc_core::ports::{ActivationHandler, AddedElementsCallback, DomError, DomPort};

use super::builder::{Child, El};
use super::selector::{ElementView, SelectorList};
use super::text::{self, RenderedText};

/// Handle to a node of an [`InMemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Handle returned by [`DomPort::observe_subtree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(u64);

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        value: Option<String>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    released: bool,
}

/// Node arena. Slots are never reused so handles stay valid; unreachable
/// nodes are emptied by [`InMemoryDocument::reclaim_detached`].
#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
}

type SharedCallback = Rc<RefCell<AddedElementsCallback<NodeId>>>;

struct ObserverEntry {
    id: ObservationId,
    target: NodeId,
    callback: SharedCallback,
    queue: Vec<NodeId>,
}

#[derive(Default)]
struct State {
    tree: RefCell<Tree>,
    observers: RefCell<Vec<ObserverEntry>>,
    next_observation: Cell<u64>,
    handlers: RefCell<HashMap<NodeId, Vec<ActivationHandler>>>,
    selection: Cell<Option<NodeId>>,
    copy_command_enabled: Cell<bool>,
    command_clipboard: RefCell<Option<String>>,
    base_url: RefCell<Option<Url>>,
}

/// Headless document implementing [`DomPort`].
///
/// Mutation records are queued per observer when nodes are inserted and are
/// delivered by [`InMemoryDocument::flush_mutations`], the stand-in for the
/// browser's microtask checkpoint. Link targets are resolved against the
/// document base URL when one is set, as `HTMLAnchorElement.href` does.
#[derive(Clone)]
pub struct InMemoryDocument {
    state: Rc<State>,
    root: NodeId,
    body: NodeId,
}

impl Default for InMemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocument {
    /// Creates `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        let state = State::default();
        state.copy_command_enabled.set(true);

        let (root, body) = {
            let mut tree = state.tree.borrow_mut();
            let root = tree.create_element("html");
            let head = tree.create_element("head");
            let body = tree.create_element("body");
            tree.attach(root, head, false);
            tree.attach(root, body, false);
            (root, body)
        };

        Self {
            state: Rc::new(state),
            root,
            body,
        }
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Materializes `template` as a detached element tree.
    pub fn build(&self, template: El) -> NodeId {
        let mut tree = self.state.tree.borrow_mut();
        tree.build(template)
    }

    /// Builds `template` and appends it to `parent`, queueing mutation records.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a text node.
    pub fn append(&self, parent: NodeId, template: El) -> NodeId {
        let node = self.build(template);
        self.insert(parent, node, false)
            .expect("parent must be an element");
        node
    }

    pub fn append_to_body(&self, template: El) -> NodeId {
        self.append(self.body, template)
    }

    /// Delivers queued mutation batches until no observer has pending records.
    ///
    /// Returns the number of batches delivered.
    pub fn flush_mutations(&self) -> usize {
        let mut delivered = 0;
        loop {
            let batches: Vec<(SharedCallback, Vec<NodeId>)> = self
                .state
                .observers
                .borrow_mut()
                .iter_mut()
                .filter(|entry| !entry.queue.is_empty())
                .map(|entry| (entry.callback.clone(), std::mem::take(&mut entry.queue)))
                .collect();

            if batches.is_empty() {
                return delivered;
            }

            for (callback, added) in batches {
                let mut callback = callback.borrow_mut();
                (*callback)(added);
                delivered += 1;
            }
        }
    }

    pub fn active_observers(&self) -> usize {
        self.state.observers.borrow().len()
    }

    /// Runs every activation handler bound to `element`, then reclaims the
    /// detached nodes the handlers left behind.
    pub fn click(&self, element: NodeId) -> LocalBoxFuture<'static, ()> {
        let handlers = self
            .state
            .handlers
            .borrow()
            .get(&element)
            .cloned()
            .unwrap_or_default();
        let pending: Vec<_> = handlers.iter().map(|handler| (**handler)()).collect();
        let doc = self.clone();
        join_all(pending)
            .map(move |_| {
                doc.reclaim_detached();
            })
            .boxed_local()
    }

    /// Empties every node not reachable from the document root, an observed
    /// target or the selection, and drops their activation handlers.
    ///
    /// Released handles stay valid and read as empty text nodes. Returns the
    /// number of nodes released by this call.
    pub fn reclaim_detached(&self) -> usize {
        let keep: Vec<NodeId> = std::iter::once(self.root)
            .chain(self.state.observers.borrow().iter().map(|entry| entry.target))
            .chain(self.state.selection.get())
            .collect();
        let released = self.state.tree.borrow_mut().release_unreachable(&keep);

        let mut handlers = self.state.handlers.borrow_mut();
        for id in &released {
            handlers.remove(id);
        }
        released.len()
    }

    /// Arena slots holding live (unreleased) nodes, attached or not.
    pub fn live_nodes(&self) -> usize {
        self.state
            .tree
            .borrow()
            .nodes
            .iter()
            .filter(|node| !node.released)
            .count()
    }

    /// Sets the base URL that relative `href`s resolve against.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Host`] if `base` is not an absolute URL.
    pub fn set_base_url(&self, base: &str) -> Result<(), DomError> {
        let url = Url::parse(base)
            .map_err(|err| DomError::Host(format!("invalid base url `{base}`: {err}")))?;
        *self.state.base_url.borrow_mut() = Some(url);
        Ok(())
    }

    /// Makes `execCommand("copy")` report failure, as locked-down pages do.
    pub fn set_copy_command_enabled(&self, enabled: bool) {
        self.state.copy_command_enabled.set(enabled);
    }

    /// Text placed on the clipboard by the last successful copy command.
    pub fn command_clipboard(&self) -> Option<String> {
        self.state.command_clipboard.borrow().clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.tree.borrow().node(node).parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state.tree.borrow().node(node).children.clone()
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        match &self.state.tree.borrow().node(node).kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.state.tree.borrow().is_inclusive_ancestor(self.root, node)
    }

    /// Number of element nodes currently attached under `body`.
    pub fn element_count(&self) -> usize {
        let tree = self.state.tree.borrow();
        tree.descendants(self.body)
            .into_iter()
            .filter(|id| tree.is_element(*id))
            .count()
    }

    fn insert(&self, parent: NodeId, child: NodeId, at_start: bool) -> Result<(), DomError> {
        {
            let mut tree = self.state.tree.borrow_mut();
            if !tree.is_element(parent) || tree.is_inclusive_ancestor(child, parent) {
                return Err(DomError::Host("hierarchy request error".into()));
            }
            tree.detach(child);
            tree.attach(parent, child, at_start);
        }
        self.record_added(parent, child);
        Ok(())
    }

    fn record_added(&self, parent: NodeId, child: NodeId) {
        let tree = self.state.tree.borrow();
        if !tree.is_element(child) {
            return;
        }
        for entry in self.state.observers.borrow_mut().iter_mut() {
            if tree.is_inclusive_ancestor(entry.target, parent) {
                entry.queue.push(child);
            }
        }
    }

    fn with_selector<T>(
        &self,
        selector: &str,
        f: impl FnOnce(&Tree, &SelectorList) -> T,
    ) -> Result<T, DomError> {
        let list = SelectorList::parse(selector)?;
        let tree = self.state.tree.borrow();
        Ok(f(&tree, &list))
    }
}

impl Tree {
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            released: false,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            value: None,
        })
    }

    fn build(&mut self, template: El) -> NodeId {
        let id = self.push(NodeKind::Element {
            tag: template.tag,
            attrs: template.attrs,
            value: None,
        });
        for child in template.children {
            let child_id = match child {
                Child::Element(element) => self.build(element),
                Child::Text(text) => self.push(NodeKind::Text(text)),
            };
            self.attach(id, child_id, false);
        }
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, at_start: bool) {
        self.node_mut(child).parent = Some(parent);
        let children = &mut self.node_mut(parent).children;
        if at_start {
            children.insert(0, child);
        } else {
            children.push(child);
        }
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent).children.retain(|id| *id != child);
        }
    }

    fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Descendants of `scope` in tree order, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    fn view(&self, id: NodeId) -> TreeElement<'_> {
        TreeElement { tree: self, id }
    }

    fn matches(&self, id: NodeId, list: &SelectorList) -> bool {
        self.is_element(id) && list.matches(&self.view(id))
    }

    fn release_unreachable(&mut self, keep: &[NodeId]) -> Vec<NodeId> {
        let mut reachable = vec![false; self.nodes.len()];
        for &root in keep {
            if reachable[root.0] {
                continue;
            }
            reachable[root.0] = true;
            for id in self.descendants(root) {
                reachable[id.0] = true;
            }
        }

        let mut released = Vec::new();
        for (index, node) in self.nodes.iter_mut().enumerate() {
            if reachable[index] || node.released {
                continue;
            }
            node.kind = NodeKind::Text(String::new());
            node.parent = None;
            node.children = Vec::new();
            node.released = true;
            released.push(NodeId(index));
        }
        released
    }

    fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let kind = match &self.node(id).kind {
            NodeKind::Element { tag, attrs, value } => NodeKind::Element {
                tag: tag.clone(),
                attrs: attrs.clone(),
                value: value.clone(),
            },
            NodeKind::Text(text) => NodeKind::Text(text.clone()),
        };
        let copy = self.push(kind);
        for child in self.node(id).children.clone() {
            let child_copy = self.clone_subtree(child);
            self.attach(copy, child_copy, false);
        }
        copy
    }

    fn render_text(&self, id: NodeId, out: &mut RenderedText) {
        match &self.node(id).kind {
            NodeKind::Text(content) => out.push_text(content),
            NodeKind::Element { tag, .. } => {
                let tag = tag.as_str();
                if text::HIDDEN_ELEMENTS.contains(&tag) {
                    return;
                }
                if tag == "br" {
                    out.line_break();
                    return;
                }
                let block = text::BLOCK_ELEMENTS.contains(&tag);
                if block {
                    out.block_boundary();
                }
                for child in &self.node(id).children {
                    self.render_text(*child, out);
                }
                if block {
                    out.block_boundary();
                }
            }
        }
    }

    fn serialize_children(&self, id: NodeId, raw: bool, out: &mut String) {
        for child in &self.node(id).children {
            self.serialize(*child, raw, out);
        }
    }

    fn serialize(&self, id: NodeId, raw: bool, out: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text(content) if raw => out.push_str(content),
            NodeKind::Text(content) => text::escape_text(content, out),
            NodeKind::Element { tag, attrs, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    text::escape_attribute(value, out);
                    out.push('"');
                }
                out.push('>');
                if text::is_void(tag) {
                    return;
                }
                self.serialize_children(id, text::is_raw_text(tag), out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

#[derive(Clone)]
struct TreeElement<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> ElementView for TreeElement<'a> {
    fn local_name(&self) -> &str {
        match &self.tree.node(self.id).kind {
            NodeKind::Element { tag, .. } => tag,
            NodeKind::Text(_) => "",
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.tree.attribute(self.id, name)
    }

    fn parent_element(&self) -> Option<Self> {
        self.tree
            .node(self.id)
            .parent
            .filter(|parent| self.tree.is_element(*parent))
            .map(|parent| self.tree.view(parent))
    }
}

impl DomPort for InMemoryDocument {
    type Element = NodeId;
    type Observation = ObservationId;

    fn document_element(&self) -> NodeId {
        self.root
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn closest(&self, element: &NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.with_selector(selector, |tree, list| {
            let mut current = Some(*element);
            while let Some(id) = current {
                if tree.matches(id, list) {
                    return Some(id);
                }
                current = tree.node(id).parent;
            }
            None
        })
    }

    fn matches(&self, element: &NodeId, selector: &str) -> Result<bool, DomError> {
        self.with_selector(selector, |tree, list| tree.matches(*element, list))
    }

    fn query_selector(&self, scope: &NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.with_selector(selector, |tree, list| {
            tree.descendants(*scope)
                .into_iter()
                .find(|id| tree.matches(*id, list))
        })
    }

    fn query_selector_all(&self, scope: &NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.with_selector(selector, |tree, list| {
            tree.descendants(*scope)
                .into_iter()
                .filter(|id| tree.matches(*id, list))
                .collect()
        })
    }

    fn get_attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.state
            .tree
            .borrow()
            .attribute(*element, name)
            .map(str::to_string)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut tree = self.state.tree.borrow_mut();
        match &mut tree.node_mut(*element).kind {
            NodeKind::Element { attrs, .. } => {
                let name = name.to_ascii_lowercase();
                match attrs.iter_mut().find(|(k, _)| *k == name) {
                    Some((_, existing)) => *existing = value.to_string(),
                    None => attrs.push((name, value.to_string())),
                }
                Ok(())
            }
            NodeKind::Text(_) => Err(DomError::Host("text nodes have no attributes".into())),
        }
    }

    fn remove_attribute(&self, element: &NodeId, name: &str) {
        let mut tree = self.state.tree.borrow_mut();
        if let NodeKind::Element { attrs, .. } = &mut tree.node_mut(*element).kind {
            attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }
    }

    fn link_target(&self, element: &NodeId) -> Option<String> {
        let href = self.get_attribute(element, "href")?;
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let resolved = match self.state.base_url.borrow().as_ref() {
            Some(base) => base.join(href),
            None => Url::parse(href),
        };
        // Without a base, relative links stay as written.
        Some(resolved.map(String::from).unwrap_or_else(|_| href.to_string()))
    }

    fn inner_text(&self, element: &NodeId) -> String {
        let tree = self.state.tree.borrow();
        let mut out = RenderedText::default();
        for child in &tree.node(*element).children {
            tree.render_text(*child, &mut out);
        }
        out.finish()
    }

    fn inner_html(&self, element: &NodeId) -> String {
        let tree = self.state.tree.borrow();
        let raw = match &tree.node(*element).kind {
            NodeKind::Element { tag, .. } => text::is_raw_text(tag),
            NodeKind::Text(_) => false,
        };
        let mut out = String::new();
        tree.serialize_children(*element, raw, &mut out);
        out
    }

    fn clone_deep(&self, element: &NodeId) -> Result<NodeId, DomError> {
        Ok(self.state.tree.borrow_mut().clone_subtree(*element))
    }

    fn remove(&self, element: &NodeId) {
        self.state.tree.borrow_mut().detach(*element);
        if let Some(selected) = self.state.selection.get() {
            if !self.is_connected(selected) {
                self.state.selection.set(None);
            }
        }
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomError::Host(format!("invalid tag name `{tag}`")));
        }
        Ok(self.state.tree.borrow_mut().create_element(tag))
    }

    fn prepend(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.insert(*parent, *child, true)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.insert(*parent, *child, false)
    }

    fn set_value(&self, element: &NodeId, new_value: &str) {
        let mut tree = self.state.tree.borrow_mut();
        if let NodeKind::Element { value, .. } = &mut tree.node_mut(*element).kind {
            *value = Some(new_value.to_string());
        }
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let mut declarations: Vec<(String, String)> = self
            .get_attribute(element, "style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|decl| {
                let (k, v) = decl.split_once(':')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .filter(|(k, _)| k != property)
            .collect();
        declarations.push((property.to_string(), value.to_string()));

        let style = declarations
            .iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(element, "style", &style)
    }

    fn focus_and_select(&self, element: &NodeId) -> Result<(), DomError> {
        if !self.is_connected(*element) {
            return Err(DomError::Detached);
        }
        self.state.selection.set(Some(*element));
        Ok(())
    }

    fn exec_copy_command(&self) -> Result<bool, DomError> {
        if !self.state.copy_command_enabled.get() {
            return Ok(false);
        }
        let Some(selected) = self.state.selection.get() else {
            return Ok(false);
        };

        let value = match &self.state.tree.borrow().node(selected).kind {
            NodeKind::Element { value, .. } => value.clone(),
            NodeKind::Text(_) => None,
        };
        let copied = value.unwrap_or_else(|| self.inner_text(&selected));
        *self.state.command_clipboard.borrow_mut() = Some(copied);
        Ok(true)
    }

    fn on_activate(&self, element: &NodeId, handler: ActivationHandler) -> Result<(), DomError> {
        self.state
            .handlers
            .borrow_mut()
            .entry(*element)
            .or_default()
            .push(handler);
        Ok(())
    }

    fn observe_subtree(
        &self,
        target: &NodeId,
        callback: AddedElementsCallback<NodeId>,
    ) -> Result<ObservationId, DomError> {
        let id = ObservationId(self.state.next_observation.get());
        self.state.next_observation.set(id.0 + 1);
        self.state.observers.borrow_mut().push(ObserverEntry {
            id,
            target: *target,
            callback: Rc::new(RefCell::new(callback)),
            queue: Vec::new(),
        });
        Ok(id)
    }

    fn disconnect(&self, observation: ObservationId) {
        self.state
            .observers
            .borrow_mut()
            .retain(|entry| entry.id != observation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::el;

    fn message(doc: &InMemoryDocument) -> NodeId {
        doc.append_to_body(
            el("div").qa("message_container").child(
                el("div")
                    .qa("message-text")
                    .child(el("p").text("Hello  <world>"))
                    .child(el("script").text("alert(1)"))
                    .child(el("p").text("second").child(el("br")).text("line")),
            ),
        )
    }

    #[test]
    fn queries_exclude_the_scope_and_follow_tree_order() {
        let doc = InMemoryDocument::new();
        let root = message(&doc);

        assert_eq!(doc.query_selector(&root, "[data-qa=message_container]").unwrap(), None);
        let paragraphs = doc.query_selector_all(&root, "p").unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(doc.inner_text(&paragraphs[0]), "Hello <world>");
    }

    #[test]
    fn closest_starts_at_the_element() {
        let doc = InMemoryDocument::new();
        let root = message(&doc);
        let text = doc.query_selector(&root, "[data-qa=message-text]").unwrap().unwrap();

        assert_eq!(doc.closest(&text, "[data-qa]").unwrap(), Some(text));
        assert_eq!(doc.closest(&text, "[data-qa=message_container]").unwrap(), Some(root));
        assert_eq!(doc.closest(&text, "table").unwrap(), None);
    }

    #[test]
    fn inner_text_skips_scripts_and_breaks_lines() {
        let doc = InMemoryDocument::new();
        let root = message(&doc);
        assert_eq!(doc.inner_text(&root), "Hello <world>\nsecond\nline");
    }

    #[test]
    fn inner_html_escapes_text_but_not_script_bodies() {
        let doc = InMemoryDocument::new();
        let node = doc.append_to_body(
            el("div")
                .child(el("b").attr("title", "a\"b").text("x < y"))
                .child(el("img").attr("src", "i.png"))
                .child(el("script").text("if (a < b) {}")),
        );
        assert_eq!(
            doc.inner_html(&node),
            r#"<b title="a&quot;b">x &lt; y</b><img src="i.png"><script>if (a < b) {}</script>"#
        );
    }

    #[test]
    fn clone_is_detached_and_independent() {
        let doc = InMemoryDocument::new();
        let root = message(&doc);
        let copy = doc.clone_deep(&root).unwrap();

        assert!(!doc.is_connected(copy));
        let script = doc.query_selector(&copy, "script").unwrap().unwrap();
        doc.remove(&script);

        assert!(doc.query_selector(&root, "script").unwrap().is_some());
        assert!(doc.query_selector(&copy, "script").unwrap().is_none());
    }

    #[test]
    fn observers_receive_added_elements_under_their_target_only() {
        let doc = InMemoryDocument::new();
        let outside = doc.append(doc.document_element(), el("aside"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let observation = doc
            .observe_subtree(&doc.body_id(), Box::new(move |added: Vec<NodeId>| sink.borrow_mut().push(added)))
            .unwrap();

        let first = doc.append_to_body(el("div"));
        let nested = doc.append(first, el("span"));
        doc.append(outside, el("p"));
        assert_eq!(doc.flush_mutations(), 1);
        assert_eq!(seen.borrow().as_slice(), &[vec![first, nested]]);

        doc.disconnect(observation);
        doc.append_to_body(el("div"));
        assert_eq!(doc.flush_mutations(), 0);
        assert_eq!(doc.active_observers(), 0);
    }

    #[test]
    fn insert_rejects_cycles() {
        let doc = InMemoryDocument::new();
        let outer = doc.append_to_body(el("div"));
        let inner = doc.append(outer, el("div"));
        assert!(doc.append_child(&inner, &outer).is_err());
    }

    #[test]
    fn copy_command_copies_selected_value() {
        let doc = InMemoryDocument::new();
        let area = doc.create_element("textarea").unwrap();
        doc.set_value(&area, "copied");
        assert_eq!(doc.focus_and_select(&area), Err(DomError::Detached));

        doc.append_child(&doc.body_id(), &area).unwrap();
        doc.focus_and_select(&area).unwrap();
        assert_eq!(doc.exec_copy_command(), Ok(true));
        assert_eq!(doc.command_clipboard().as_deref(), Some("copied"));

        doc.remove(&area);
        assert_eq!(doc.exec_copy_command(), Ok(false));
    }

    #[test]
    fn link_targets_resolve_against_the_base_url() {
        let doc = InMemoryDocument::new();
        let rooted = doc.append_to_body(el("a").attr("href", "/files/a.png"));
        let relative = doc.append_to_body(el("a").attr("href", "files/a.png"));
        let absolute = doc.append_to_body(el("a").attr("href", "https://cdn.example/b.png"));

        assert_eq!(doc.link_target(&rooted).as_deref(), Some("/files/a.png"));

        doc.set_base_url("https://chat.example/").unwrap();
        assert_eq!(
            doc.link_target(&rooted).as_deref(),
            Some("https://chat.example/files/a.png")
        );
        assert_eq!(
            doc.link_target(&relative).as_deref(),
            Some("https://chat.example/files/a.png")
        );
        assert_eq!(
            doc.link_target(&absolute).as_deref(),
            Some("https://cdn.example/b.png")
        );
        assert!(doc.set_base_url("not a url").is_err());
    }

    #[test]
    fn reclaim_releases_detached_clones_but_keeps_the_live_tree() {
        let doc = InMemoryDocument::new();
        let root = message(&doc);
        let live = doc.live_nodes();

        let copy = doc.clone_deep(&root).unwrap();
        let area = doc.create_element("textarea").unwrap();
        assert!(doc.live_nodes() > live + 1);

        let released = doc.reclaim_detached();
        assert!(released > 1);
        assert_eq!(doc.live_nodes(), live);
        assert_eq!(doc.tag_name(copy), None);
        assert!(doc.children(copy).is_empty());
        assert_eq!(doc.get_attribute(&area, "style"), None);
        assert_eq!(doc.inner_text(&root), "Hello <world>\nsecond\nline");
        assert!(doc.is_connected(root));
        assert_eq!(doc.reclaim_detached(), 0);
    }

    #[test]
    fn set_style_replaces_existing_property() {
        let doc = InMemoryDocument::new();
        let node = doc.create_element("div").unwrap();
        doc.set_style(&node, "opacity", "1").unwrap();
        doc.set_style(&node, "position", "fixed").unwrap();
        doc.set_style(&node, "opacity", "0").unwrap();
        assert_eq!(
            doc.get_attribute(&node, "style").as_deref(),
            Some("position: fixed; opacity: 0;")
        );
    }
}

use js_sys::Array;
use std::fmt;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlAnchorElement, HtmlDocument, HtmlElement, HtmlTextAreaElement,
    MutationObserver, MutationObserverInit, MutationRecord, NodeList,
};

use cc_core::ports::{ActivationHandler, AddedElementsCallback, DomError, DomPort};

use crate::js::describe;

type MutationCallback = Closure<dyn FnMut(Array, MutationObserver)>;

/// Live observation; dropping the closure after `disconnect` releases it.
pub struct WebObservation {
    observer: MutationObserver,
    _callback: MutationCallback,
}

impl fmt::Debug for WebObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebObservation").finish_non_exhaustive()
    }
}

/// [`DomPort`] over the page's `document`.
#[derive(Clone)]
pub struct WebDom {
    document: Document,
    root: Element,
}

impl WebDom {
    pub fn new(document: Document) -> Result<Self, DomError> {
        let root = document.document_element().ok_or(DomError::Detached)?;
        Ok(Self { document, root })
    }

    pub fn from_window() -> Result<Self, DomError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| DomError::Host("no window document".to_string()))?;
        Self::new(document)
    }
}

fn host(err: JsValue) -> DomError {
    DomError::Host(describe(&err))
}

fn invalid(selector: &str) -> impl FnOnce(JsValue) -> DomError + '_ {
    move |_| DomError::InvalidSelector(selector.to_string())
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl DomPort for WebDom {
    type Element = Element;
    type Observation = WebObservation;

    fn document_element(&self) -> Element {
        self.root.clone()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn closest(&self, element: &Element, selector: &str) -> Result<Option<Element>, DomError> {
        element.closest(selector).map_err(invalid(selector))
    }

    fn matches(&self, element: &Element, selector: &str) -> Result<bool, DomError> {
        element.matches(selector).map_err(invalid(selector))
    }

    fn query_selector(&self, scope: &Element, selector: &str) -> Result<Option<Element>, DomError> {
        scope.query_selector(selector).map_err(invalid(selector))
    }

    fn query_selector_all(&self, scope: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
        let list = scope.query_selector_all(selector).map_err(invalid(selector))?;
        Ok(elements(&list))
    }

    fn get_attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> Result<(), DomError> {
        element.set_attribute(name, value).map_err(host)
    }

    fn remove_attribute(&self, element: &Element, name: &str) {
        if let Err(err) = element.remove_attribute(name) {
            tracing::debug!(name, error = %describe(&err), "remove_attribute failed");
        }
    }

    fn link_target(&self, element: &Element) -> Option<String> {
        match element.dyn_ref::<HtmlAnchorElement>() {
            Some(anchor) => Some(anchor.href()).filter(|href| !href.is_empty()),
            None => element.get_attribute("href"),
        }
    }

    fn inner_text(&self, element: &Element) -> String {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.inner_text(),
            None => element.text_content().unwrap_or_default(),
        }
    }

    fn inner_html(&self, element: &Element) -> String {
        element.inner_html()
    }

    fn clone_deep(&self, element: &Element) -> Result<Element, DomError> {
        element
            .clone_node_with_deep(true)
            .map_err(host)?
            .dyn_into::<Element>()
            .map_err(|_| DomError::Host("cloned node is not an element".to_string()))
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(host)
    }

    fn prepend(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.prepend_with_node_1(child).map_err(host)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(|_| ()).map_err(host)
    }

    fn set_value(&self, element: &Element, value: &str) {
        match element.dyn_ref::<HtmlTextAreaElement>() {
            Some(textarea) => textarea.set_value(value),
            None => element.set_text_content(Some(value)),
        }
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> Result<(), DomError> {
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Host("element has no inline style".to_string()))?;
        html.style().set_property(property, value).map_err(host)
    }

    fn focus_and_select(&self, element: &Element) -> Result<(), DomError> {
        let textarea = element
            .dyn_ref::<HtmlTextAreaElement>()
            .ok_or_else(|| DomError::Host("only text areas can be selected".to_string()))?;
        textarea.focus().map_err(host)?;
        textarea.select();
        Ok(())
    }

    fn exec_copy_command(&self) -> Result<bool, DomError> {
        match self.document.dyn_ref::<HtmlDocument>() {
            Some(document) => document.exec_command("copy").map_err(host),
            None => Ok(false),
        }
    }

    fn on_activate(&self, element: &Element, handler: ActivationHandler) -> Result<(), DomError> {
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            event.stop_propagation();
            wasm_bindgen_futures::spawn_local(handler());
        });
        element
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .map_err(host)?;
        // The listener lives as long as the button; the page owns both.
        listener.forget();
        Ok(())
    }

    fn observe_subtree(
        &self,
        target: &Element,
        mut callback: AddedElementsCallback<Element>,
    ) -> Result<WebObservation, DomError> {
        let closure = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |records: Array, _observer: MutationObserver| {
                let added: Vec<Element> = records
                    .iter()
                    .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                    .flat_map(|record| elements(&record.added_nodes()))
                    .collect();
                if !added.is_empty() {
                    callback(added);
                }
            },
        );

        let observer = MutationObserver::new(closure.as_ref().unchecked_ref()).map_err(host)?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(target, &init).map_err(host)?;

        Ok(WebObservation {
            observer,
            _callback: closure,
        })
    }

    fn disconnect(&self, observation: WebObservation) {
        observation.observer.disconnect();
    }
}

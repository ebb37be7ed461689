//! DOM port - abstracts the host document
//!
//! The document belongs to a third party. Use cases only read it, clone from
//! it, and insert their own affordance nodes; the DOM itself is the source of
//! truth for what has already been decorated.

use futures::future::LocalBoxFuture;
use std::fmt;
use std::rc::Rc;

use super::DomError;

/// Work started by a user activation; the host drives it to completion.
pub type ActivationFuture = LocalBoxFuture<'static, ()>;

/// Invoked once per user activation of an affordance element.
pub type ActivationHandler = Rc<dyn Fn() -> ActivationFuture>;

/// Receives each batch of element nodes added under an observed subtree.
pub type AddedElementsCallback<E> = Box<dyn FnMut(Vec<E>)>;

/// Host document operations used by the copy pipeline and the injector.
///
/// Queries follow `Element.querySelector*` semantics: the scope element
/// itself is never part of the result. `closest` starts at the element.
pub trait DomPort {
    type Element: Clone + fmt::Debug + PartialEq + 'static;
    type Observation;

    fn document_element(&self) -> Self::Element;

    fn body(&self) -> Option<Self::Element>;

    fn closest(&self, element: &Self::Element, selector: &str)
        -> Result<Option<Self::Element>, DomError>;

    fn matches(&self, element: &Self::Element, selector: &str) -> Result<bool, DomError>;

    fn query_selector(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, DomError>;

    fn query_selector_all(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, DomError>;

    fn get_attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&self, element: &Self::Element, name: &str, value: &str)
        -> Result<(), DomError>;

    fn remove_attribute(&self, element: &Self::Element, name: &str);

    /// Absolute link target of an anchor, as `HTMLAnchorElement.href` reports it.
    fn link_target(&self, element: &Self::Element) -> Option<String>;

    /// Rendered text: scripts dropped, whitespace collapsed, blocks on their own lines.
    fn inner_text(&self, element: &Self::Element) -> String;

    fn inner_html(&self, element: &Self::Element) -> String;

    /// Detached deep copy of `element`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Host`] if the host refuses to clone the node.
    fn clone_deep(&self, element: &Self::Element) -> Result<Self::Element, DomError>;

    fn remove(&self, element: &Self::Element);

    fn create_element(&self, tag: &str) -> Result<Self::Element, DomError>;

    fn prepend(&self, parent: &Self::Element, child: &Self::Element) -> Result<(), DomError>;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element)
        -> Result<(), DomError>;

    fn set_value(&self, element: &Self::Element, value: &str);

    fn set_style(&self, element: &Self::Element, property: &str, value: &str)
        -> Result<(), DomError>;

    fn focus_and_select(&self, element: &Self::Element) -> Result<(), DomError>;

    /// `document.execCommand("copy")` against the current selection.
    fn exec_copy_command(&self) -> Result<bool, DomError>;

    fn on_activate(&self, element: &Self::Element, handler: ActivationHandler)
        -> Result<(), DomError>;

    /// Starts a subtree-wide child-list observation of `target`.
    fn observe_subtree(
        &self,
        target: &Self::Element,
        callback: AddedElementsCallback<Self::Element>,
    ) -> Result<Self::Observation, DomError>;

    fn disconnect(&self, observation: Self::Observation);
}

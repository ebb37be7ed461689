use futures::FutureExt;
use std::cell::Cell;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use cc_core::clipboard::{result_message, CopyErrorKind, CopyResult, COPYING_LABEL, IDLE_LABEL};
use cc_core::ports::{ActivationHandler, DomError, DomPort};

use crate::usecases::CopyMessage;

const BUTTON_CLASS: &str =
    "c-button-unstyled c-icon_button c-icon_button--size_small c-message_actions__button";

/// Copy button bound to one action container.
///
/// Status is rendered in the button's `title` and `aria-label`. While a copy
/// is in flight further activations are ignored. A copy that panics is
/// reported as [`CopyErrorKind::Unknown`].
pub struct CopyAffordance<D: DomPort> {
    dom: D,
    element: D::Element,
    busy: Rc<Cell<bool>>,
}

impl<D: DomPort + Clone + 'static> CopyAffordance<D> {
    /// Creates the detached button element and binds its activation.
    ///
    /// # Errors
    ///
    /// Returns error if the button cannot be created or bound.
    pub fn create(
        dom: D,
        container: D::Element,
        copier: Rc<CopyMessage<D>>,
        marker_attribute: &str,
    ) -> Result<Self, DomError> {
        let element = dom.create_element("button")?;
        dom.set_attribute(&element, "type", "button")?;
        dom.set_attribute(&element, "class", BUTTON_CLASS)?;
        dom.set_attribute(&element, marker_attribute, "true")?;

        let affordance = Self {
            dom,
            element,
            busy: Rc::new(Cell::new(false)),
        };
        show_status(&affordance.dom, &affordance.element, IDLE_LABEL);

        let handler = affordance.activation_handler(container, copier);
        affordance.dom.on_activate(&affordance.element, handler)?;
        Ok(affordance)
    }

    fn activation_handler(
        &self,
        container: D::Element,
        copier: Rc<CopyMessage<D>>,
    ) -> ActivationHandler {
        let dom = self.dom.clone();
        let element = self.element.clone();
        let busy = self.busy.clone();

        Rc::new(move || {
            let dom = dom.clone();
            let element = element.clone();
            let busy = busy.clone();
            let container = container.clone();
            let copier = copier.clone();

            async move {
                if busy.replace(true) {
                    tracing::debug!("copy already in flight, ignoring activation");
                    return;
                }

                show_status(&dom, &element, COPYING_LABEL);
                let result = AssertUnwindSafe(copier.copy_from_container(&container))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        tracing::error!("copy pipeline panicked");
                        CopyResult::Failure(CopyErrorKind::Unknown)
                    });
                tracing::info!(?result, "copy attempt finished");
                show_status(&dom, &element, &result_message(&result));
                busy.set(false);
            }
            .boxed_local()
        })
    }
}

impl<D: DomPort> CopyAffordance<D> {
    /// The button element, detached until the injector prepends it.
    pub fn element(&self) -> &D::Element {
        &self.element
    }

    /// True while a copy is in flight; activations are ignored meanwhile.
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Current status text.
    pub fn status(&self) -> Option<String> {
        self.dom.get_attribute(&self.element, "title")
    }
}

fn show_status<D: DomPort>(dom: &D, element: &D::Element, status: &str) {
    for attribute in ["title", "aria-label"] {
        if let Err(err) = dom.set_attribute(element, attribute, status) {
            tracing::warn!(attribute, error = %err, "failed to render copy status");
        }
    }
}

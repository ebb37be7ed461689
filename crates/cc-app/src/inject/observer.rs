use std::cell::RefCell;
use std::rc::Rc;

use cc_core::ports::{DomError, DomPort};

use super::Injector;

/// Feeds elements added anywhere under a target to the [`Injector`].
///
/// At most one observation is live at a time. Each batch is processed
/// synchronously, in delivery order.
pub struct ContainerObserver<D: DomPort> {
    dom: D,
    injector: Rc<Injector<D>>,
    observation: RefCell<Option<D::Observation>>,
}

impl<D: DomPort + Clone + 'static> ContainerObserver<D> {
    /// Creates a stopped observer; call [`ContainerObserver::start`].
    pub fn new(dom: D, injector: Rc<Injector<D>>) -> Self {
        Self {
            dom,
            injector,
            observation: RefCell::new(None),
        }
    }

    /// Starts observing `target`. Returns `false` if already running.
    ///
    /// # Errors
    ///
    /// Returns error if the host cannot observe `target`.
    pub fn start(&self, target: &D::Element) -> Result<bool, DomError> {
        if self.observation.borrow().is_some() {
            return Ok(false);
        }

        tracing::info!("starting mutation observer");
        let injector = self.injector.clone();
        let observation = self.dom.observe_subtree(
            target,
            Box::new(move |added: Vec<D::Element>| {
                let attached: usize = added.iter().map(|node| injector.process(node)).sum();
                if attached > 0 {
                    tracing::debug!(attached, "decorated added containers");
                }
            }),
        )?;
        *self.observation.borrow_mut() = Some(observation);
        Ok(true)
    }

    /// Disconnects the observation. A no-op when stopped.
    pub fn stop(&self) {
        if let Some(observation) = self.observation.borrow_mut().take() {
            tracing::info!("stopping mutation observer");
            self.dom.disconnect(observation);
        }
    }

    pub fn is_running(&self) -> bool {
        self.observation.borrow().is_some()
    }
}

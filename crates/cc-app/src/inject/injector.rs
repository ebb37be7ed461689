use std::rc::Rc;

use cc_core::config::CopyConfig;
use cc_core::ports::DomPort;
use tracing::info_span;

use super::CopyAffordance;
use crate::usecases::CopyMessage;

/// Attaches a copy affordance to every eligible action container, once.
///
/// The registration marker on the live container is the only record of what
/// has been decorated; containers are never tracked in memory.
pub struct Injector<D: DomPort> {
    dom: D,
    copier: Rc<CopyMessage<D>>,
    selectors: Vec<String>,
    marker_attribute: String,
}

impl<D: DomPort + Clone + 'static> Injector<D> {
    /// Every affordance it creates shares `copier`.
    pub fn new(dom: D, copier: Rc<CopyMessage<D>>, config: &CopyConfig) -> Self {
        Self {
            dom,
            copier,
            selectors: config.eligible_container_selectors(),
            marker_attribute: config.marker_attribute.clone(),
        }
    }

    /// Decorates every eligible container under `scope`, or the whole
    /// document when no scope is given. Returns the number attached.
    pub fn scan(&self, scope: Option<&D::Element>) -> usize {
        let _span = info_span!("usecase.injector.scan").entered();
        let document = self.dom.document_element();
        let scope = scope.unwrap_or(&document);
        tracing::debug!("scanning for existing action containers");

        let mut attached = 0;
        for selector in &self.selectors {
            for container in self.query_all(scope, selector) {
                attached += usize::from(self.ensure_affordance(&container));
            }
        }
        attached
    }

    /// Decorates `element` itself and every eligible descendant.
    pub fn process(&self, element: &D::Element) -> usize {
        let _span = info_span!("usecase.injector.process").entered();
        let mut attached = 0;
        for selector in &self.selectors {
            match self.dom.matches(element, selector) {
                Ok(true) => attached += usize::from(self.ensure_affordance(element)),
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(%selector, error = %err, "skipping container selector");
                    continue;
                }
            }
            for container in self.query_all(element, selector) {
                attached += usize::from(self.ensure_affordance(&container));
            }
        }
        attached
    }

    fn ensure_affordance(&self, container: &D::Element) -> bool {
        if self
            .dom
            .get_attribute(container, &self.marker_attribute)
            .is_some()
        {
            return false;
        }

        let affordance = match CopyAffordance::create(
            self.dom.clone(),
            container.clone(),
            self.copier.clone(),
            &self.marker_attribute,
        ) {
            Ok(affordance) => affordance,
            Err(err) => {
                tracing::warn!(error = %err, "failed to create copy affordance");
                return false;
            }
        };

        let attached = self
            .dom
            .set_attribute(container, &self.marker_attribute, "true")
            .and_then(|()| self.dom.prepend(container, affordance.element()));
        match attached {
            Ok(()) => {
                tracing::debug!(?container, "attached copy affordance");
                true
            }
            Err(err) => {
                tracing::warn!(?container, error = %err, "failed to attach copy affordance");
                false
            }
        }
    }

    fn query_all(&self, scope: &D::Element, selector: &str) -> Vec<D::Element> {
        self.dom
            .query_selector_all(scope, selector)
            .unwrap_or_else(|err| {
                tracing::warn!(%selector, error = %err, "skipping container selector");
                Vec::new()
            })
    }
}

use anyhow::Context;
use std::rc::Rc;

use cc_core::config::CopyConfig;
use cc_core::ports::{DomError, DomPort};

use crate::deps::CopyDeps;
use crate::inject::{ContainerObserver, Injector};
use crate::usecases::CopyMessage;

/// Wires the copy pipeline to the injection engine for one document.
pub struct CopyEngine<D: DomPort> {
    dom: D,
    copier: Rc<CopyMessage<D>>,
    injector: Rc<Injector<D>>,
    observer: ContainerObserver<D>,
}

impl<D: DomPort + Clone + 'static> CopyEngine<D> {
    /// This constructor signature is the dependency manifest.
    pub fn new(dom: D, deps: CopyDeps, config: &CopyConfig) -> Self {
        let copier = Rc::new(CopyMessage::new(dom.clone(), deps, config));
        let injector = Rc::new(Injector::new(dom.clone(), copier.clone(), config));
        let observer = ContainerObserver::new(dom.clone(), injector.clone());
        Self {
            dom,
            copier,
            injector,
            observer,
        }
    }

    /// Decorates existing containers, then watches `body` for new ones.
    ///
    /// Returns the number of containers decorated by the initial scan.
    /// Starting a running engine only rescans.
    ///
    /// # Errors
    ///
    /// Returns error if the document has no `body` or it cannot be observed.
    pub fn start(&self) -> anyhow::Result<usize> {
        let body = self
            .dom
            .body()
            .ok_or(DomError::NoBody)
            .context("cannot start copy engine")?;

        let attached = self.injector.scan(None);
        tracing::info!(attached, "initial scan finished");

        self.observer
            .start(&body)
            .context("failed to observe document body")?;
        Ok(attached)
    }

    /// Disconnects the observer. Buttons already attached stay in place and
    /// keep working.
    pub fn stop(&self) {
        self.observer.stop();
    }

    /// Whether the engine is observing the document.
    pub fn is_running(&self) -> bool {
        self.observer.is_running()
    }

    pub fn injector(&self) -> &Injector<D> {
        &self.injector
    }

    /// The copy pipeline shared by every attached button.
    pub fn copier(&self) -> &CopyMessage<D> {
        &self.copier
    }
}

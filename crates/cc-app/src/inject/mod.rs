//! Discovers action containers and decorates each with a copy affordance.

mod affordance;
mod injector;
mod observer;

pub use affordance::CopyAffordance;
pub use injector::Injector;
pub use observer::ContainerObserver;

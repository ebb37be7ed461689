//! chatcopy application layer
//!
//! Use cases for copying a chat message to the clipboard and the injection
//! engine that decorates message action bars with a copy affordance. All
//! host access goes through the ports in `cc-core`.

pub mod deps;
pub mod engine;
pub mod inject;
pub mod usecases;

pub use deps::CopyDeps;
pub use engine::CopyEngine;
pub use inject::{ContainerObserver, CopyAffordance, Injector};
pub use usecases::CopyMessage;

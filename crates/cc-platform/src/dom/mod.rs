//! Headless host document.

mod builder;
mod document;
mod selector;
mod text;

pub use builder::{el, El, FixtureNode};
pub use document::{InMemoryDocument, NodeId, ObservationId};
pub use selector::{ElementView, SelectorList};

//! Synchronous per-component change notification

use umlboard_common::ComponentId;

use crate::diagram::ClassDiagram;

/// A listener attached to one component of a diagram
///
/// `update` runs synchronously during
/// [`notify_observers`](ClassDiagram::notify_observers), in registration
/// order. Observers must not re-enter a mutating operation on the same
/// component from inside the callback.
pub trait DiagramObserver {
    /// Called with the diagram and the id of the changed component
    fn update(&self, diagram: &ClassDiagram, component: ComponentId);
}

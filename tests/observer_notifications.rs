//! Notification bus behavior: change marks and synchronous delivery

use std::cell::RefCell;
use std::sync::Arc;

use umlboard_common::ComponentId;
use umlboard_model::{ClassDiagram, DiagramObserver, EntityKind, Visibility};

/// Records every delivery it receives, tagged with a label
struct Recorder {
    label: &'static str,
    deliveries: RefCell<Vec<(&'static str, ComponentId)>>,
}

impl Recorder {
    fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Recorder {
            label,
            deliveries: RefCell::new(Vec::new()),
        })
    }
}

impl DiagramObserver for Recorder {
    fn update(&self, _diagram: &ClassDiagram, component: ComponentId) {
        self.deliveries.borrow_mut().push((self.label, component));
    }
}

#[test]
fn test_mutation_marks_component_changed() {
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    assert!(diagram.is_changed(id));
}

#[test]
fn test_notify_delivers_then_clears_mark() {
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    let recorder = Recorder::new("a");
    diagram.add_observer(id, recorder.clone());

    diagram.notify_observers(id);
    assert_eq!(recorder.deliveries.borrow().as_slice(), &[("a", id)]);
    assert!(!diagram.is_changed(id));

    // A second notify without a new mutation delivers nothing.
    diagram.notify_observers(id);
    assert_eq!(recorder.deliveries.borrow().len(), 1);
}

#[test]
fn test_delivery_follows_registration_order() {
    struct Tagged {
        label: &'static str,
        sink: Arc<RefCell<Vec<&'static str>>>,
    }
    impl DiagramObserver for Tagged {
        fn update(&self, _diagram: &ClassDiagram, _component: ComponentId) {
            self.sink.borrow_mut().push(self.label);
        }
    }

    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    let sink = Arc::new(RefCell::new(Vec::new()));
    diagram.add_observer(
        id,
        Arc::new(Tagged {
            label: "first",
            sink: sink.clone(),
        }),
    );
    diagram.add_observer(
        id,
        Arc::new(Tagged {
            label: "second",
            sink: sink.clone(),
        }),
    );
    diagram.notify_observers(id);
    assert_eq!(sink.borrow().as_slice(), &["first", "second"]);
}

#[test]
fn test_deleted_observer_stops_receiving() {
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    let keep = Recorder::new("keep");
    let drop_me = Recorder::new("drop");
    diagram.add_observer(id, keep.clone());
    diagram.add_observer(id, drop_me.clone());

    let as_dyn: Arc<dyn DiagramObserver> = drop_me.clone();
    diagram.delete_observer(id, &as_dyn);

    diagram.notify_observers(id);
    assert_eq!(keep.deliveries.borrow().len(), 1);
    assert!(drop_me.deliveries.borrow().is_empty());
}

#[test]
fn test_undo_marks_component_changed_again() {
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    diagram.set_entity_visibility(id, Visibility::Private);
    diagram.notify_observers(id);
    assert!(!diagram.is_changed(id));

    diagram.undo();
    assert!(diagram.is_changed(id));
}

//! End-to-end undo/redo scenarios over the class-diagram document

use umlboard_model::{
    ClassDiagram, DataType, DeclineDeabstract, EntityKind, Multiplicity, Visibility,
};
use umlboard_xml::export_diagram;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_every_mutation_is_one_transaction() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    assert_eq!(diagram.undo_depth(), 1);
    diagram
        .add_attribute(id, "count", DataType::new("int"), None)
        .unwrap();
    assert_eq!(diagram.undo_depth(), 2);
    diagram.set_entity_visibility(id, Visibility::Private);
    assert_eq!(diagram.undo_depth(), 3);
    diagram.set_entity_stereotype(id, "utility");
    assert_eq!(diagram.undo_depth(), 4);
}

#[test]
fn test_blocked_mutations_are_not_undoable() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    let was = diagram.set_blocked(true);
    diagram
        .add_attribute(id, "hidden", DataType::new("int"), None)
        .unwrap();
    diagram.set_entity_visibility(id, Visibility::Private);
    diagram.set_blocked(was);
    assert_eq!(diagram.undo_depth(), 1);
    // The only recorded transaction is entity creation; undoing it removes
    // the entity, not the blocked edits.
    assert!(diagram.undo());
    assert!(diagram.entity(id).is_none());
}

#[test]
fn test_grouped_mutations_undo_as_one_unit() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    diagram.record();
    diagram
        .add_attribute(id, "a", DataType::new("int"), None)
        .unwrap();
    diagram
        .add_attribute(id, "b", DataType::new("int"), None)
        .unwrap();
    diagram.set_entity_visibility(id, Visibility::Protected);
    diagram.stop_record();
    assert_eq!(diagram.undo_depth(), 2);

    assert!(diagram.undo());
    let entity = diagram.entity(id).unwrap();
    assert!(entity.attributes().is_empty());
    assert_eq!(entity.visibility(), Visibility::Public);

    assert!(diagram.redo());
    let entity = diagram.entity(id).unwrap();
    assert_eq!(entity.attributes().len(), 2);
    assert_eq!(entity.visibility(), Visibility::Protected);
}

#[test]
fn test_idempotent_setters_push_nothing() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    diagram.notify_observers(id);
    assert!(!diagram.is_changed(id));
    let depth = diagram.undo_depth();
    assert!(!diagram.set_entity_visibility(id, Visibility::Public));
    assert!(!diagram.set_entity_name(id, "Foo"));
    assert_eq!(diagram.undo_depth(), depth);
    assert!(!diagram.is_changed(id));
}

#[test]
fn test_method_abstract_flag_follows_concrete_entity() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    let method = diagram
        .create_method(id, "run", DataType::default(), Visibility::Public, None)
        .unwrap();
    // The owner is concrete, so the method cannot come out abstract.
    assert!(!diagram.entity(id).unwrap().method(method).unwrap().is_abstract());
    assert!(!diagram.set_method_abstract(id, method, true));
    assert!(!diagram.entity(id).unwrap().method(method).unwrap().is_abstract());
}

#[test]
fn test_deabstract_with_accepting_policy() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Shape", Visibility::Public)
        .unwrap();
    diagram.set_entity_abstract(id, true);
    let method = diagram
        .create_method(id, "area", DataType::new("double"), Visibility::Public, None)
        .unwrap();
    assert!(diagram.entity(id).unwrap().method(method).unwrap().is_abstract());

    diagram.set_entity_abstract(id, false);
    let entity = diagram.entity(id).unwrap();
    assert!(!entity.is_abstract());
    assert!(!entity.method(method).unwrap().is_abstract());

    // The whole de-abstraction reverses atomically.
    assert!(diagram.undo());
    let entity = diagram.entity(id).unwrap();
    assert!(entity.is_abstract());
    assert!(entity.method(method).unwrap().is_abstract());
}

#[test]
fn test_deabstract_with_declining_policy() {
    init_tracing();
    let mut diagram = ClassDiagram::with_policy(Box::new(DeclineDeabstract));
    let id = diagram
        .create_entity(EntityKind::Class, "Shape", Visibility::Public)
        .unwrap();
    diagram.set_entity_abstract(id, true);
    let method = diagram
        .create_method(id, "area", DataType::new("double"), Visibility::Public, None)
        .unwrap();

    diagram.set_entity_abstract(id, false);
    let entity = diagram.entity(id).unwrap();
    // The policy declined, so the entity stays abstract despite the request.
    assert!(entity.is_abstract());
    assert!(entity.method(method).unwrap().is_abstract());
}

#[test]
fn test_undo_of_removal_restores_original_index() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    let mut attrs = Vec::new();
    for name in ["a0", "a1", "a2", "a3", "a4"] {
        attrs.push(
            diagram
                .add_attribute(id, name, DataType::new("int"), None)
                .unwrap(),
        );
    }
    assert!(diagram.remove_attribute(id, attrs[2]));
    assert_eq!(diagram.entity(id).unwrap().attributes().len(), 4);

    assert!(diagram.undo());
    let entity = diagram.entity(id).unwrap();
    assert_eq!(entity.attributes().len(), 5);
    assert_eq!(entity.attributes()[2].id(), attrs[2]);
    assert_eq!(entity.attributes()[2].name(), "a2");
}

#[test]
fn test_move_method_undo_restores_position() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    let mut methods = Vec::new();
    for name in ["m0", "m1", "m2", "m3"] {
        methods.push(
            diagram
                .create_method(id, name, DataType::default(), Visibility::Public, None)
                .unwrap(),
        );
    }
    assert!(diagram.move_method_position(id, methods[1], 2));
    assert_eq!(diagram.entity(id).unwrap().methods()[3].id(), methods[1]);

    assert!(diagram.undo());
    assert_eq!(diagram.entity(id).unwrap().methods()[1].id(), methods[1]);

    assert!(diagram.redo());
    assert_eq!(diagram.entity(id).unwrap().methods()[3].id(), methods[1]);
}

#[test]
fn test_new_mutation_discards_redo_history() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    diagram.set_entity_visibility(id, Visibility::Private);
    assert!(diagram.undo());
    assert!(diagram.can_redo());
    diagram.set_entity_stereotype(id, "entity");
    assert!(!diagram.can_redo());
}

#[test]
fn test_undo_redo_full_round_trip_with_export() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let person = diagram
        .create_entity(EntityKind::Class, "Person", Visibility::Public)
        .unwrap();
    let baseline = export_diagram(&diagram).to_xml();

    let age = diagram
        .add_attribute(person, "age", DataType::new("int"), None)
        .unwrap();
    let rename = diagram
        .create_method(person, "rename", DataType::default(), Visibility::Public, None)
        .unwrap();
    diagram
        .add_parameter(person, rename, "value", DataType::new("String"))
        .unwrap();
    diagram.set_attribute_constant(person, age, true);
    diagram.set_entity_name(person, "Human");
    let edited = export_diagram(&diagram).to_xml();
    assert_ne!(baseline, edited);

    let steps = diagram.undo_depth() - 1;
    for _ in 0..steps {
        assert!(diagram.undo());
    }
    assert_eq!(export_diagram(&diagram).to_xml(), baseline);

    for _ in 0..steps {
        assert!(diagram.redo());
    }
    assert_eq!(export_diagram(&diagram).to_xml(), edited);
}

#[test]
fn test_remove_entity_with_relationships_undoes_atomically() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let base = diagram
        .create_entity(EntityKind::Class, "Base", Visibility::Public)
        .unwrap();
    let derived = diagram
        .create_entity(EntityKind::Class, "Derived", Visibility::Public)
        .unwrap();
    let edge = diagram.add_inheritance(base, derived).unwrap();
    let association = diagram.create_association("uses");
    let role = diagram
        .add_role(association, base, Multiplicity::exactly(1))
        .unwrap();

    assert!(diagram.remove_entity(base));
    assert!(diagram.entity(base).is_none());
    assert!(diagram.inheritance(edge).is_none());
    assert!(diagram.role(role).is_none());

    assert!(diagram.undo());
    assert!(diagram.entity(base).is_some());
    assert!(diagram.inheritance(edge).is_some());
    assert!(diagram.role(role).is_some());
    assert!(diagram.is_child_of(derived, base));
    assert!(diagram.entity(base).unwrap().roles().contains(&role));
}

#[test]
fn test_undo_after_node_destruction_is_safe() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Foo", Visibility::Public)
        .unwrap();
    diagram.set_entity_visibility(id, Visibility::Private);
    diagram.set_entity_stereotype(id, "x");

    // Drop the entity without recording, stranding the field snapshots.
    let was = diagram.set_blocked(true);
    diagram.remove_entity(id);
    diagram.set_blocked(was);
    assert!(diagram.entity(id).is_none());

    // Replaying snapshots against the destroyed node is a diagnostic no-op.
    assert!(diagram.undo());
    assert!(diagram.undo());
    assert!(diagram.entity(id).is_none());
}

#[test]
fn test_name_uniqueness_is_scoped_per_kind() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Value", Visibility::Public)
        .unwrap();
    // A method and an attribute may share a name; two attributes may not.
    diagram
        .add_attribute(id, "total", DataType::new("int"), None)
        .unwrap();
    diagram
        .create_method(id, "total", DataType::new("int"), Visibility::Public, None)
        .unwrap();
    assert!(diagram
        .add_attribute(id, "total", DataType::new("long"), None)
        .is_err());
}

#[test]
fn test_rename_frees_previous_name() {
    init_tracing();
    let mut diagram = ClassDiagram::new();
    let id = diagram
        .create_entity(EntityKind::Class, "Old", Visibility::Public)
        .unwrap();
    assert!(diagram.set_entity_name(id, "New"));
    assert!(diagram
        .create_entity(EntityKind::Class, "Old", Visibility::Public)
        .is_ok());
    // "New" is now taken.
    assert!(diagram
        .create_entity(EntityKind::Class, "New", Visibility::Public)
        .is_err());
}

//! Snapshot buffers: immutable facts about a node's state at capture time

use serde::{Deserialize, Serialize};
use umlboard_common::ComponentId;

use crate::entity::Entity;
use crate::method::Method;
use crate::relationship::{Association, Inheritance, Role};
use crate::variable::Variable;

/// Field-level state of an entity, excluding its member lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Entity this snapshot belongs to
    pub id: ComponentId,
    /// Captured name
    pub name: String,
    /// Captured visibility
    pub visibility: crate::values::Visibility,
    /// Captured abstract flag
    pub is_abstract: bool,
    /// Captured stereotype
    pub stereotype: String,
}

/// A snapshot record replayed during undo and redo
///
/// Each variant carries a full copy of the mutable fields relevant to its
/// node kind. A `None` index means the element was absent at capture time;
/// restoring such a snapshot removes the element, restoring an indexed one
/// reinserts it at the captured position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Buffer {
    /// Entity field state (name, visibility, abstract flag, stereotype)
    Entity(EntityState),
    /// Entity presence in the diagram, with its full deep contents
    EntityIndex {
        /// Deep copy of the entity, member lists included
        entity: Entity,
        /// Position in the diagram order, or `None` when absent
        index: Option<usize>,
    },
    /// Attribute presence within its entity
    AttributeIndex {
        /// Owning entity
        entity: ComponentId,
        /// Copy of the attribute
        attribute: Variable,
        /// Position in the attribute list, or `None` when absent
        index: Option<usize>,
    },
    /// Method presence within its entity
    MethodIndex {
        /// Owning entity
        entity: ComponentId,
        /// Copy of the method, parameters included
        method: Method,
        /// Position in the method list, or `None` when absent
        index: Option<usize>,
    },
    /// Full field state of a method, parameters included
    Method {
        /// Copy of the method at capture time
        method: Method,
    },
    /// Field state of an attribute
    Attribute {
        /// Owning entity
        entity: ComponentId,
        /// Copy of the attribute at capture time
        variable: Variable,
    },
    /// Field state of a role (name, visibility, multiplicity)
    Role {
        /// Copy of the role at capture time
        role: Role,
    },
    /// Presence of an inheritance edge
    InheritanceLink {
        /// Copy of the edge
        inheritance: Inheritance,
        /// Whether the edge existed at capture time
        present: bool,
    },
    /// Presence of an association together with its roles
    AssociationLink {
        /// Copy of the association
        association: Association,
        /// Copies of its roles at capture time
        roles: Vec<Role>,
        /// Whether the association existed at capture time
        present: bool,
    },
    /// Presence of a single role endpoint
    RoleLink {
        /// Copy of the role
        role: Role,
        /// Whether the role existed at capture time
        present: bool,
    },
}

impl Buffer {
    /// Id of the component this snapshot restores
    pub fn component(&self) -> ComponentId {
        match self {
            Buffer::Entity(state) => state.id,
            Buffer::EntityIndex { entity, .. } => entity.id(),
            Buffer::AttributeIndex { attribute, .. } => attribute.id(),
            Buffer::MethodIndex { method, .. } => method.id(),
            Buffer::Method { method } => method.id(),
            Buffer::Attribute { variable, .. } => variable.id(),
            Buffer::Role { role } => role.id(),
            Buffer::InheritanceLink { inheritance, .. } => inheritance.id(),
            Buffer::AssociationLink { association, .. } => association.id(),
            Buffer::RoleLink { role, .. } => role.id(),
        }
    }
}

impl EntityState {
    /// Capture the field state of `entity`
    pub fn capture(entity: &Entity) -> Self {
        EntityState {
            id: entity.id(),
            name: entity.name().to_string(),
            visibility: entity.visibility(),
            is_abstract: entity.is_abstract(),
            stereotype: entity.stereotype().to_string(),
        }
    }
}

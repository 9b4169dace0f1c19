//! Relationships: inheritance edges, associations and their roles

use serde::{Deserialize, Serialize};
use umlboard_common::ComponentId;

use crate::values::{Multiplicity, Visibility};

/// A directed parent-to-child generalization between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inheritance {
    pub(crate) id: ComponentId,
    pub(crate) parent: ComponentId,
    pub(crate) child: ComponentId,
}

impl Inheritance {
    /// Unique identifier of this edge
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The generalizing entity
    pub fn parent(&self) -> ComponentId {
        self.parent
    }

    /// The specializing entity
    pub fn child(&self) -> ComponentId {
        self.child
    }
}

/// An association between entities, described through its roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub(crate) id: ComponentId,
    pub(crate) name: String,
    pub(crate) roles: Vec<ComponentId>,
}

impl Association {
    /// Unique identifier of this association
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The association's name, empty when unset
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role endpoints in attachment order
    pub fn roles(&self) -> &[ComponentId] {
        &self.roles
    }
}

/// One endpoint of an association
///
/// Jointly owned: both the association and the decorated entity reference
/// it, and both are updated when it is added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub(crate) id: ComponentId,
    pub(crate) name: String,
    pub(crate) visibility: Visibility,
    pub(crate) multiplicity: Multiplicity,
    pub(crate) association: ComponentId,
    pub(crate) entity: ComponentId,
}

impl Role {
    /// Unique identifier of this role
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The role's name, empty when unset
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The role's visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Participation bounds at this end
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// The association this role belongs to
    pub fn association(&self) -> ComponentId {
        self.association
    }

    /// The entity this role decorates
    pub fn entity(&self) -> ComponentId {
        self.entity
    }
}

//! Entities: the class-like nodes of the diagram

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use umlboard_common::ComponentId;

use crate::error::ModelError;
use crate::method::Method;
use crate::values::Visibility;
use crate::variable::Variable;

/// The concrete kind of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A plain class
    Class,
    /// An interface; members are implicitly abstract
    Interface,
    /// A class attached to an association
    AssociationClass,
}

impl EntityKind {
    /// Get all entity kinds.
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Class,
            EntityKind::Interface,
            EntityKind::AssociationClass,
        ]
    }

    /// The kind a deep copy of this kind produces
    ///
    /// An association class is attached to a specific association, which a
    /// copy cannot share, so its copies are plain classes.
    pub fn clone_target(&self) -> EntityKind {
        match self {
            EntityKind::AssociationClass => EntityKind::Class,
            other => *other,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Class => "class",
            EntityKind::Interface => "interface",
            EntityKind::AssociationClass => "association_class",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(EntityKind::Class),
            "interface" => Ok(EntityKind::Interface),
            "association_class" => Ok(EntityKind::AssociationClass),
            _ => Err(ModelError::invalid_argument(format!(
                "unknown entity kind: {}",
                s
            ))),
        }
    }
}

/// A class-like node owning attributes and methods
///
/// Inheritance and role edges are referenced by id; the edges themselves
/// live on the diagram so both endpoints see one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) id: ComponentId,
    pub(crate) kind: EntityKind,
    pub(crate) name: String,
    pub(crate) visibility: Visibility,
    pub(crate) is_abstract: bool,
    pub(crate) stereotype: String,
    pub(crate) attributes: Vec<Variable>,
    pub(crate) methods: Vec<Method>,
    pub(crate) edges_as_parent: Vec<ComponentId>,
    pub(crate) edges_as_child: Vec<ComponentId>,
    pub(crate) roles: Vec<ComponentId>,
}

impl Entity {
    pub(crate) fn new(
        id: ComponentId,
        kind: EntityKind,
        name: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        Entity {
            id,
            kind,
            name: name.into(),
            visibility,
            is_abstract: false,
            stereotype: String::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
            edges_as_parent: Vec::new(),
            edges_as_child: Vec::new(),
            roles: Vec::new(),
        }
    }

    /// Unique identifier of this entity
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The entity's concrete kind
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The entity's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entity's visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// True when the entity is abstract
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// The entity's stereotype, empty when unset
    pub fn stereotype(&self) -> &str {
        &self.stereotype
    }

    /// Attributes in display order
    pub fn attributes(&self) -> &[Variable] {
        &self.attributes
    }

    /// Methods in display order
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Inheritance edges where this entity is the parent
    pub fn edges_as_parent(&self) -> &[ComponentId] {
        &self.edges_as_parent
    }

    /// Inheritance edges where this entity is the child
    pub fn edges_as_child(&self) -> &[ComponentId] {
        &self.edges_as_child
    }

    /// Role edges attached to this entity
    pub fn roles(&self) -> &[ComponentId] {
        &self.roles
    }

    /// True when at least one method is abstract
    pub fn has_abstract_methods(&self) -> bool {
        self.methods.iter().any(|m| m.is_abstract)
    }

    /// Number of static methods
    pub fn static_method_count(&self) -> usize {
        self.methods.iter().filter(|m| m.is_static).count()
    }

    /// Look up an attribute by id
    pub fn attribute(&self, id: ComponentId) -> Option<&Variable> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// Look up a method by id
    pub fn method(&self, id: ComponentId) -> Option<&Method> {
        self.methods.iter().find(|m| m.id == id)
    }

    pub(crate) fn attribute_index(&self, id: ComponentId) -> Option<usize> {
        self.attributes.iter().position(|a| a.id == id)
    }

    pub(crate) fn method_index(&self, id: ComponentId) -> Option<usize> {
        self.methods.iter().position(|m| m.id == id)
    }

    pub(crate) fn attribute_mut(&mut self, id: ComponentId) -> Option<&mut Variable> {
        self.attributes.iter_mut().find(|a| a.id == id)
    }

    pub(crate) fn method_mut(&mut self, id: ComponentId) -> Option<&mut Method> {
        self.methods.iter_mut().find(|m| m.id == id)
    }
}

//! Attributes and parameters

use serde::{Deserialize, Serialize};
use umlboard_common::ComponentId;

use crate::values::DataType;

/// An attribute of an entity, or a parameter of a method
///
/// Owned exclusively by its entity (attributes) or method (parameters);
/// removal from the owner is the only destruction path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub(crate) id: ComponentId,
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) constant: bool,
}

impl Variable {
    pub(crate) fn new(id: ComponentId, name: impl Into<String>, data_type: DataType) -> Self {
        Variable {
            id,
            name: name.into(),
            data_type,
            constant: false,
        }
    }

    /// Unique identifier of this variable
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The variable's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable's declared type
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// True when the variable is a constant
    pub fn is_constant(&self) -> bool {
        self.constant
    }
}

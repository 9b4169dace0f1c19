//! Shared value types: visibility, data types, multiplicity, display styles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// UML member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible everywhere (`+`)
    Public,
    /// Visible to the owner only (`-`)
    Private,
    /// Visible to the owner and its descendants (`#`)
    Protected,
    /// Visible within the owning package (`~`)
    Package,
}

impl Visibility {
    /// Get all visibility levels.
    pub fn all() -> &'static [Visibility] {
        &[
            Visibility::Public,
            Visibility::Private,
            Visibility::Protected,
            Visibility::Package,
        ]
    }

    /// The UML prefix symbol for this visibility
    pub fn symbol(&self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Package => '~',
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
            Visibility::Package => "package",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Visibility {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" | "+" => Ok(Visibility::Public),
            "private" | "-" => Ok(Visibility::Private),
            "protected" | "#" => Ok(Visibility::Protected),
            "package" | "~" => Ok(Visibility::Package),
            _ => Err(ModelError::invalid_argument(format!(
                "unknown visibility: {}",
                s
            ))),
        }
    }
}

/// A type reference by name only; no structural identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    name: String,
}

impl DataType {
    /// Create a data type from its name
    pub fn new(name: impl Into<String>) -> Self {
        DataType { name: name.into() }
    }

    /// The type name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::new("void")
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Bounds on how many instances participate in a relationship end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplicity {
    /// Minimum participant count
    pub lower: u32,
    /// Maximum participant count; `None` means unbounded (`*`)
    pub upper: Option<u32>,
}

impl Multiplicity {
    /// A bounded range
    pub fn new(lower: u32, upper: Option<u32>) -> Self {
        Multiplicity { lower, upper }
    }

    /// Exactly `n` participants
    pub fn exactly(n: u32) -> Self {
        Multiplicity {
            lower: n,
            upper: Some(n),
        }
    }

    /// The `0..*` range
    pub fn zero_or_many() -> Self {
        Multiplicity {
            lower: 0,
            upper: None,
        }
    }

    /// The `0..1` range
    pub fn zero_or_one() -> Self {
        Multiplicity {
            lower: 0,
            upper: Some(1),
        }
    }

    /// Exactly one participant
    pub fn one() -> Self {
        Multiplicity::exactly(1)
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Multiplicity::exactly(1)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) if upper == self.lower => write!(f, "{}", self.lower),
            Some(upper) => write!(f, "{}..{}", self.lower, upper),
            None => write!(f, "{}..*", self.lower),
        }
    }
}

/// How a method renders its parameter list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterViewStyle {
    /// Follow the diagram-wide setting
    Default,
    /// Parameter names only
    Name,
    /// Hide parameters entirely
    Nothing,
    /// Parameter types only
    Type,
    /// Both type and name
    TypeAndName,
}

impl ParameterViewStyle {
    /// Get all display styles.
    pub fn all() -> &'static [ParameterViewStyle] {
        &[
            ParameterViewStyle::Default,
            ParameterViewStyle::Name,
            ParameterViewStyle::Nothing,
            ParameterViewStyle::Type,
            ParameterViewStyle::TypeAndName,
        ]
    }
}

impl Default for ParameterViewStyle {
    fn default() -> Self {
        ParameterViewStyle::Default
    }
}

impl fmt::Display for ParameterViewStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterViewStyle::Default => "default",
            ParameterViewStyle::Name => "name",
            ParameterViewStyle::Nothing => "nothing",
            ParameterViewStyle::Type => "type",
            ParameterViewStyle::TypeAndName => "type_and_name",
        };
        write!(f, "{}", name)
    }
}

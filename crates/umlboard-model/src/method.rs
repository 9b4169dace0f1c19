//! Methods and their parameter lists

use serde::{Deserialize, Serialize};
use umlboard_common::ComponentId;

use crate::values::{DataType, ParameterViewStyle, Visibility};
use crate::variable::Variable;

/// An operation declared on an entity
///
/// Belongs to exactly one entity, kept as a non-owning back-reference.
/// A method cannot be abstract unless its owning entity is abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub(crate) id: ComponentId,
    pub(crate) name: String,
    pub(crate) return_type: DataType,
    pub(crate) visibility: Visibility,
    pub(crate) is_abstract: bool,
    pub(crate) is_static: bool,
    pub(crate) parameters: Vec<Variable>,
    pub(crate) entity: ComponentId,
    pub(crate) view_style: ParameterViewStyle,
}

impl Method {
    pub(crate) fn new(
        id: ComponentId,
        name: impl Into<String>,
        return_type: DataType,
        visibility: Visibility,
        entity: ComponentId,
    ) -> Self {
        Method {
            id,
            name: name.into(),
            return_type,
            visibility,
            is_abstract: false,
            is_static: false,
            parameters: Vec::new(),
            entity,
            view_style: ParameterViewStyle::Default,
        }
    }

    /// Unique identifier of this method
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The method's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The method's return type
    pub fn return_type(&self) -> &DataType {
        &self.return_type
    }

    /// The method's visibility
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// True when the method is abstract
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// True when the method is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Parameters in declaration order
    pub fn parameters(&self) -> &[Variable] {
        &self.parameters
    }

    /// Id of the owning entity
    pub fn entity(&self) -> ComponentId {
        self.entity
    }

    /// How this method renders its parameter list
    pub fn view_style(&self) -> ParameterViewStyle {
        self.view_style
    }

    pub(crate) fn parameter_index(&self, parameter: ComponentId) -> Option<usize> {
        self.parameters.iter().position(|p| p.id == parameter)
    }

    /// Render the UML signature line with a resolved display style
    ///
    /// Callers resolve [`ParameterViewStyle::Default`] through the
    /// diagram-wide setting first; passing it here renders type and name.
    pub fn signature(&self, style: ParameterViewStyle) -> String {
        let parameters = match style {
            ParameterViewStyle::Nothing => String::new(),
            ParameterViewStyle::Name => self
                .parameters
                .iter()
                .map(|p| p.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
            ParameterViewStyle::Type => self
                .parameters
                .iter()
                .map(|p| p.data_type.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            ParameterViewStyle::TypeAndName | ParameterViewStyle::Default => self
                .parameters
                .iter()
                .map(|p| format!("{} : {}", p.name, p.data_type))
                .collect::<Vec<_>>()
                .join(", "),
        };
        format!(
            "{}{}({}) : {}",
            self.visibility.symbol(),
            self.name,
            parameters,
            self.return_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Method {
        let mut method = Method::new(
            ComponentId::from_raw(1),
            "resize",
            DataType::new("bool"),
            Visibility::Public,
            ComponentId::from_raw(0),
        );
        method.parameters.push(Variable::new(
            ComponentId::from_raw(2),
            "width",
            DataType::new("int"),
        ));
        method.parameters.push(Variable::new(
            ComponentId::from_raw(3),
            "height",
            DataType::new("int"),
        ));
        method
    }

    #[test]
    fn test_signature_type_and_name() {
        let method = sample();
        assert_eq!(
            method.signature(ParameterViewStyle::TypeAndName),
            "+resize(width : int, height : int) : bool"
        );
    }

    #[test]
    fn test_signature_other_styles() {
        let method = sample();
        assert_eq!(
            method.signature(ParameterViewStyle::Name),
            "+resize(width, height) : bool"
        );
        assert_eq!(
            method.signature(ParameterViewStyle::Type),
            "+resize(int, int) : bool"
        );
        assert_eq!(
            method.signature(ParameterViewStyle::Nothing),
            "+resize() : bool"
        );
    }
}

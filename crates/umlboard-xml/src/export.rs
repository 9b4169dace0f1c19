//! Read-only traversal of a diagram into XML elements
//!
//! One-way only: the model exposes itself to the exporter, nothing here
//! parses documents back.

use umlboard_model::{ClassDiagram, Entity, Method, Multiplicity, Role, Variable};

use crate::element::XmlElement;

/// Render a whole diagram under a `classDiagram` root element
pub fn export_diagram(diagram: &ClassDiagram) -> XmlElement {
    let mut root = XmlElement::new("classDiagram");
    for entity in diagram.entities() {
        root.append_child(export_entity(entity));
    }
    for entity in diagram.entities() {
        for edge in entity.edges_as_parent() {
            if let Some(inheritance) = diagram.inheritance(*edge) {
                let mut element = XmlElement::new("inheritance");
                element.set_attribute("id", inheritance.id().to_string());
                element.set_attribute("parent", inheritance.parent().to_string());
                element.set_attribute("child", inheritance.child().to_string());
                root.append_child(element);
            }
        }
    }
    root
}

/// Render one entity with its attributes and methods
pub fn export_entity(entity: &Entity) -> XmlElement {
    let mut element = XmlElement::new("entity");
    element.set_attribute("id", entity.id().to_string());
    element.set_attribute("name", entity.name());
    element.set_attribute("visibility", entity.visibility().to_string());
    element.set_attribute("entityType", entity.kind().to_string());
    element.set_attribute("isAbstract", entity.is_abstract().to_string());
    for attribute in entity.attributes() {
        element.append_child(export_variable(attribute));
    }
    for method in entity.methods() {
        element.append_child(export_method(method));
    }
    element
}

/// Render an attribute or parameter
pub fn export_variable(variable: &Variable) -> XmlElement {
    let mut element = XmlElement::new("variable");
    element.set_attribute("name", variable.name());
    element.set_attribute("type", variable.data_type().to_string());
    element.set_attribute("const", variable.is_constant().to_string());
    element
}

/// Render a method with its parameters as child variables
pub fn export_method(method: &Method) -> XmlElement {
    let mut element = XmlElement::new("method");
    element.set_attribute("name", method.name());
    element.set_attribute("view", method.view_style().to_string());
    element.set_attribute("returnType", method.return_type().to_string());
    element.set_attribute("visibility", method.visibility().to_string());
    element.set_attribute("isStatic", method.is_static().to_string());
    element.set_attribute("isAbstract", method.is_abstract().to_string());
    for parameter in method.parameters() {
        element.append_child(export_variable(parameter));
    }
    element
}

/// Render a role endpoint, multiplicity included
pub fn export_role(role: &Role) -> XmlElement {
    let mut element = XmlElement::new("role");
    element.set_attribute("componentId", role.entity().to_string());
    element.set_attribute("visibility", role.visibility().to_string());
    if !role.name().is_empty() {
        element.set_attribute("name", role.name());
    }
    element.append_child(export_multiplicity(&role.multiplicity()));
    element
}

/// Render a multiplicity as `min`/`max` bounds, `*` for unbounded
pub fn export_multiplicity(multiplicity: &Multiplicity) -> XmlElement {
    let mut element = XmlElement::new("multiplicity");
    element.set_attribute("min", multiplicity.lower.to_string());
    match multiplicity.upper {
        Some(upper) => element.set_attribute("max", upper.to_string()),
        None => element.set_attribute("max", "*"),
    }
    element
}

#![warn(missing_docs)]

//! XML export boundary for umlboard
//!
//! A one-way model-to-document contract: the diagram is traversed
//! read-only into an element tree which renders as indented, escaped XML.
//! Parsing documents back into a model is out of scope.

pub mod element;
pub mod export;

// Re-export public API
pub use element::XmlElement;
pub use export::{
    export_diagram, export_entity, export_method, export_multiplicity, export_role,
    export_variable,
};

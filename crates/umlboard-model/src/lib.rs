#![warn(missing_docs)]

//! Class-diagram document model for umlboard
//!
//! A mutable, observer-notified graph of entities, attributes, methods,
//! inheritance edges and association roles. Every mutation records paired
//! before/after snapshots into a per-document change log, so any sequence
//! of edits can be undone and redone field-for-field.

pub mod buffer;
pub mod diagram;
pub mod entity;
pub mod error;
pub mod method;
pub mod observer;
pub mod policy;
pub mod relationship;
pub mod values;
pub mod variable;

// Re-export public API
pub use buffer::{Buffer, EntityState};
pub use diagram::ClassDiagram;
pub use entity::{Entity, EntityKind};
pub use error::ModelError;
pub use method::Method;
pub use observer::DiagramObserver;
pub use policy::{AcceptDeabstract, ConfirmationPolicy, DeclineDeabstract};
pub use relationship::{Association, Inheritance, Role};
pub use values::{DataType, Multiplicity, ParameterViewStyle, Visibility};
pub use variable::Variable;

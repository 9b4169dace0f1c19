#![warn(missing_docs)]

//! Shared services for umlboard
//!
//! Provides the component identifier allocator and the per-kind name
//! validation registry used by every node in the diagram model.

pub mod id;
pub mod validation;

// Re-export public API
pub use id::{ComponentId, IdAllocator};
pub use validation::{verify_name, NameKind, NameRegistry};

//! Error types for the document model

use thiserror::Error;
use umlboard_common::ComponentId;

/// Errors that can occur while mutating a class diagram
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required argument was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced component does not exist in this diagram
    #[error("Unknown component: {0}")]
    UnknownComponent(ComponentId),

    /// The inheritance edge would make an entity its own ancestor
    #[error("Inheritance cycle: {parent} -> {child}")]
    InheritanceCycle {
        /// Entity requested as parent
        parent: ComponentId,
        /// Entity requested as child
        child: ComponentId,
    },

    /// A deep copy could not be produced
    #[error("Clone failed for component: {0}")]
    CloneFailed(ComponentId),
}

impl ModelError {
    /// Create a new InvalidArgument error with context
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
